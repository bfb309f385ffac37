//! CLI configuration: `mudda.toml` and `MUDDA__*` environment variables.

use std::path::PathBuf;

use mudda_core::calculator::TaxRate;
use mudda_core::report::{FontSet, ReportHeader, ReportLayout};
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where the case book lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("mudda-store.json")
}

/// Report header, fonts and page geometry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub header: ReportHeader,
    #[serde(default)]
    pub fonts: FontSet,
    #[serde(default)]
    pub layout: ReportLayout,
    /// Require every configured font file to exist before rendering.
    #[serde(default)]
    pub check_fonts: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculatorConfig {
    /// Tax rate used when a command does not give one.
    #[serde(default)]
    pub default_tax_rate: TaxRate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `MUDDA_LOG`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

impl AppConfig {
    /// Loads configuration from `mudda.toml` (or `explicit`), then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or a value has the wrong type.
    pub fn load(explicit: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("mudda").required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("MUDDA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::default();
        assert_eq!(config.store.path, PathBuf::from("mudda-store.json"));
        assert_eq!(config.calculator.default_tax_rate, TaxRate::OnePercent);
        assert!(!config.report.check_fonts);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let raw = r#"
            [store]
            path = "/var/lib/mudda/book.json"

            [report.header]
            tribunal = "ऋण असुली न्यायाधिकरण, काठमाडौं"
            subtitle = "राजस्व रकम दाखिला"

            [calculator]
            default_tax_rate = "0.005"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.store.path, PathBuf::from("/var/lib/mudda/book.json"));
        assert!(config.report.header.tribunal.ends_with("काठमाडौं"));
        assert_eq!(config.calculator.default_tax_rate, TaxRate::HalfPercent);
        assert_eq!(config.report.fonts, FontSet::default());
    }
}
