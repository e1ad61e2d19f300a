// Domain layer: core models and ports (interfaces). Adapters live in crate::adapters.

pub mod model;
pub mod ports;
