pub mod export;
pub mod import;

pub use export::*;
pub use import::*;

/// File format for import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Csv => "csv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(DataFormat::Json),
            "csv" => Some(DataFormat::Csv),
            _ => None,
        }
    }

    /// Guess the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        if lower.ends_with(".csv") {
            DataFormat::Csv
        } else {
            DataFormat::Json
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(DataFormat::from_str("CSV"), Some(DataFormat::Csv));
        assert_eq!(DataFormat::from_str("json"), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_str("xml"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DataFormat::from_path("entries.CSV"), DataFormat::Csv);
        assert_eq!(DataFormat::from_path("entries.json"), DataFormat::Json);
        assert_eq!(DataFormat::from_path("entries"), DataFormat::Json);
    }
}
