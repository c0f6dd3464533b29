use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accounting::chart::ChartOfAccounts;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),
    #[error("{name} must be positive, got {rate}")]
    InvalidRate { name: &'static str, rate: Decimal },
}

/// Everything about the target journal that is not in the order export.
///
/// Any key left out of a config file keeps its default. Rates are best
/// written as strings (`standard_rate = "0.20"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub journal_code: String,
    pub standard_rate: Decimal,
    pub reduced_rate: Decimal,
    /// A tax whose name contains one of these is collected at the reduced rate.
    pub reduced_rate_markers: Vec<String>,
    pub input_delimiter: char,
    pub output_delimiter: char,
    pub accounts: ChartOfAccounts,
}

impl Default for JournalConfig {
    fn default() -> Self {
        JournalConfig {
            journal_code: "VT2".to_string(),
            standard_rate: dec!(0.20),
            reduced_rate: dec!(0.055),
            reduced_rate_markers: vec!["5.5".to_string(), "5,5".to_string()],
            input_delimiter: ',',
            output_delimiter: ';',
            accounts: ChartOfAccounts::default(),
        }
    }
}

impl JournalConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<JournalConfig, ConfigError> {
        let content = fs::read_to_string(path)?;
        JournalConfig::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<JournalConfig, ConfigError> {
        let config: JournalConfig = toml::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rate) in [("standard_rate", self.standard_rate), ("reduced_rate", self.reduced_rate)] {
            if rate <= Decimal::ZERO {
                return Err(ConfigError::InvalidRate { name, rate });
            }
        }

        self.input_delimiter_byte()?;
        self.output_delimiter_byte()?;

        Ok(())
    }

    pub fn input_delimiter_byte(&self) -> Result<u8, ConfigError> {
        delimiter_byte(self.input_delimiter)
    }

    pub fn output_delimiter_byte(&self) -> Result<u8, ConfigError> {
        delimiter_byte(self.output_delimiter)
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8, ConfigError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(ConfigError::InvalidDelimiter(delimiter))
    }
}

#[cfg(test)]
mod config_tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::accounting::chart::{Account, AccountRole};

    #[test]
    fn test_empty_file_is_default() -> Result<()> {
        assert_eq!(JournalConfig::from_toml_str("")?, JournalConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Result<()> {
        let config = JournalConfig::from_toml_str(
            r#"
journal_code = "VE"
reduced_rate = "0.10"
output_delimiter = "\t"

[accounts.shipping]
code = "708500000"
label = "Port"
"#,
        )?;

        assert_eq!(config.journal_code, "VE");
        assert_eq!(config.reduced_rate, dec!(0.10));
        assert_eq!(config.standard_rate, dec!(0.20));
        assert_eq!(config.output_delimiter_byte()?, b'\t');
        assert_eq!(config.accounts.account(AccountRole::Shipping), &Account::new("708500000", "Port"));
        assert_eq!(config.accounts.clients, Account::new("411200000", "Clients"));

        Ok(())
    }

    #[test]
    fn test_rejects_zero_rate() {
        let err = JournalConfig::from_toml_str(r#"standard_rate = "0""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRate { name: "standard_rate", .. }));
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let err = JournalConfig::from_toml_str(r#"input_delimiter = "§""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelimiter('§')));
    }

    #[test]
    fn test_rejects_syntax_errors() {
        assert!(matches!(JournalConfig::from_toml_str("journal_code = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_default_survives_toml_round_trip() -> Result<()> {
        let config = JournalConfig::default();
        assert_eq!(JournalConfig::from_toml_str(&config.to_toml()?)?, config);
        Ok(())
    }
}
