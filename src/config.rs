//! Загрузка и проверка конфигурации стола (JSON).

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::domain::table::TableConfig;

/// Допустимый размер стола.
pub const MIN_SEATS: u8 = 2;
pub const MAX_SEATS: u8 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("не удалось прочитать конфиг {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("битый JSON конфига: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("некорректный конфиг: {0}")]
    Invalid(String),
}

impl TableConfig {
    /// Проверка согласованности: размер стола, блайнды, тайминг.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.max_seats) {
            return Err(ConfigError::Invalid(format!(
                "max_seats = {}, допустимо {MIN_SEATS}..={MAX_SEATS}",
                self.max_seats
            )));
        }
        self.stakes.validate().map_err(ConfigError::Invalid)?;
        self.time.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

/// Разобрать и проверить конфиг стола из JSON-строки.
///
/// Отсутствующие поля (ставки, тайминг, правило остатка) берутся по умолчанию.
pub fn load_table_config(json: &str) -> Result<TableConfig, ConfigError> {
    let config: TableConfig = serde_json::from_str(json)?;
    config.validate()?;
    debug!(max_seats = config.max_seats, big_blind = %config.stakes.big_blind, "конфиг стола загружен");
    Ok(config)
}

/// То же, но из файла.
pub fn load_table_config_file(path: impl AsRef<Path>) -> Result<TableConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_table_config(&raw)
}
