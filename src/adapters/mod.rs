// Adapters layer: concrete implementations of the domain ports (storage, layout files, advisor http) and CSV seeding.

pub mod advisor;
pub mod csv_seed;
pub mod file_store;
pub mod layout_file;
pub mod memory_store;

pub use advisor::{AdvisorSettings, ChatCompletionsAdvisor, DisabledAdvisor, StaticAdvisor};
pub use csv_seed::{seed_from_csv, SeedSummary};
pub use file_store::JsonFileRepository;
pub use layout_file::LayoutFile;
pub use memory_store::InMemoryRepository;
