use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::views::ViewLimits;

/// Prefix of environment overrides, e.g. `SUPERSTORE_DATA_PATH`,
/// `SUPERSTORE_PREVIEW_ROWS`.
pub const ENV_PREFIX: &str = "SUPERSTORE";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// Dashboard configuration. Every field is optional.
///
/// Sources, lowest precedence first: defaults, the JSON settings file,
/// `SUPERSTORE_*` environment variables, the command-line data path.
///
/// ```json
/// { "data_path": "data/Global_Superstore2.csv", "preview_rows": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_path: PathBuf,
    pub top_customers_by_sales: usize,
    pub top_customers_by_profit: usize,
    pub top_products_by_sales: usize,
    /// Rows shown in the Data tab table.
    pub preview_rows: usize,
    /// Suggested file name of the CSV download.
    pub export_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        let limits = ViewLimits::default();
        Self {
            data_path: PathBuf::from("Global_Superstore2.csv"),
            top_customers_by_sales: limits.top_customers_by_sales,
            top_customers_by_profit: limits.top_customers_by_profit,
            top_products_by_sales: limits.top_products_by_sales,
            preview_rows: 100,
            export_file_name: "filtered_superstore_data.csv".to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings for the running process from `config_file` (which
    /// may be absent), the process environment and `cli_data_path`.
    pub fn load(config_file: &Path, cli_data_path: Option<PathBuf>) -> Result<Self, SettingsError> {
        let settings = Self::build(config_file, None, cli_data_path)?;
        log::info!("Settings resolved from {}", config_file.display());
        Ok(settings)
    }

    /// `env` replaces the process environment when given.
    fn build(
        config_file: &Path,
        env: Option<config::Map<String, String>>,
        cli_data_path: Option<PathBuf>,
    ) -> Result<Self, SettingsError> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(config_file)
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option(
                "data_path",
                cli_data_path.map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()?;

        Ok(settings.try_deserialize::<Settings>()?)
    }

    pub fn view_limits(&self) -> ViewLimits {
        ViewLimits {
            top_customers_by_sales: self.top_customers_by_sales,
            top_customers_by_profit: self.top_customers_by_profit,
            top_products_by_sales: self.top_products_by_sales,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn json_file(text: &str) -> NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(tmp, "{text}").unwrap();
        tmp
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::build(Path::new("/no/such/dashboard.json"), env(&[]), None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.view_limits(), ViewLimits::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = json_file(r#"{ "data_path": "sales.csv", "top_products_by_sales": 3 }"#);

        let settings = Settings::build(tmp.path(), env(&[]), None).unwrap();
        assert_eq!(settings.data_path, PathBuf::from("sales.csv"));
        assert_eq!(settings.top_products_by_sales, 3);
        assert_eq!(settings.preview_rows, 100);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = json_file("{ not json");
        let err = Settings::build(tmp.path(), env(&[]), None).unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    #[test]
    fn env_beats_file_and_cli_beats_env() {
        let tmp = json_file(r#"{ "data_path": "file.csv" }"#);
        let vars = [("SUPERSTORE_DATA_PATH", "env.csv"), ("SUPERSTORE_PREVIEW_ROWS", "25")];

        let s = Settings::build(tmp.path(), env(&vars), None).unwrap();
        assert_eq!(s.data_path, PathBuf::from("env.csv"));
        assert_eq!(s.preview_rows, 25);

        let s = Settings::build(tmp.path(), env(&vars), Some("cli.csv".into())).unwrap();
        assert_eq!(s.data_path, PathBuf::from("cli.csv"));

        let s = Settings::build(tmp.path(), env(&[]), None).unwrap();
        assert_eq!(s.data_path, PathBuf::from("file.csv"));
    }
}
