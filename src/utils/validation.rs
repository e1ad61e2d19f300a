use crate::utils::error::{Result, SlottingError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SlottingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SlottingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SlottingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SlottingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SlottingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SlottingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SlottingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 指標輸入必須落在 [0, 1]，NaN 也一併拒絕
pub fn validate_unit_interval(field_name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SlottingError::validation(
            field_name,
            format!("{} is outside the allowed range [0, 1]", value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SlottingError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_max_length(field_name: &str, value: &str, max_chars: usize) -> Result<()> {
    let length = value.chars().count();
    if length > max_chars {
        return Err(SlottingError::validation(
            field_name,
            format!("Length {} exceeds the maximum of {} characters", length, max_chars),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("advisor.endpoint", "https://example.com/v1").is_ok());
        assert!(validate_url("advisor.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("advisor.endpoint", "").is_err());
        assert!(validate_url("advisor.endpoint", "invalid-url").is_err());
        assert!(validate_url("advisor.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_unit_interval() {
        assert!(validate_unit_interval("f", 0.0).is_ok());
        assert!(validate_unit_interval("f", 1.0).is_ok());
        assert!(validate_unit_interval("f", 0.42).is_ok());
        assert!(validate_unit_interval("f", -0.01).is_err());
        assert!(validate_unit_interval("f", 1.0001).is_err());
        assert!(validate_unit_interval("f", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("warehouse.width_m", 100.0).is_ok());
        assert!(validate_positive("warehouse.width_m", 0.0).is_err());
        assert!(validate_positive("warehouse.width_m", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_max_length() {
        assert!(validate_max_length("instructions", "short", 600).is_ok());
        let long = "x".repeat(601);
        assert!(matches!(
            validate_max_length("instructions", &long, 600),
            Err(SlottingError::ValidationError { .. })
        ));
    }
}
