//! Chat storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Chat storage configuration
///
/// Persistence is best-effort: a failed write is logged and the
/// conversation continues in memory.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted session records
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Maximum turns retained per session before oldest are evicted
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.trim().is_empty() {
            return Err(ValidationError::EmptyDataDir);
        }
        // One user turn and one assistant turn, minimum
        if self.history_capacity < 2 {
            return Err(ValidationError::HistoryCapacityTooSmall);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            history_capacity: default_history_capacity(),
        }
    }
}

fn default_data_dir() -> String {
    "./data/chats".to_string()
}

fn default_history_capacity() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, "./data/chats");
        assert_eq!(config.history_capacity, 20);
    }

    #[test]
    fn test_validation_empty_data_dir() {
        let config = StorageConfig {
            data_dir: "   ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_capacity_too_small() {
        let config = StorageConfig {
            history_capacity: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(StorageConfig::default().validate().is_ok());
    }
}
