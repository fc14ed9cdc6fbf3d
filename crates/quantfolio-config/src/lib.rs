//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DataSettings, FallbackSettings, LoggingConfig, ValidationError,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Prefix for environment overrides, e.g. `QUANTFOLIO__DATA__PARALLEL=true`.
pub const ENV_PREFIX: &str = "QUANTFOLIO";

/// Environment overrides shared by every loader. `data.symbols` accepts a
/// comma-separated list.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("data.symbols")
        .try_parsing(true)
}

fn load_with(file: Option<&Path>, env: Environment) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder.add_source(env).build()?.try_deserialize()
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    load_with(Some(path), environment())
}

/// Load configuration from `path` if it exists, otherwise use defaults
/// with environment overrides.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    load_with(path.exists().then_some(path), environment())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[app]
name = "demo"
environment = "test"

[data]
symbols = ["aapl", "msft"]
max_rows = 50
parallel = true

[fallback]
start_date = "2023-06-01"
seed = 9

[fallback.profiles.AAPL]
base = 10.0
volatility = 0.5
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.app.name, "demo");
        assert_eq!(config.universe().symbols(), ["AAPL", "MSFT"]);
        assert_eq!(config.data.max_rows, 50);
        assert_eq!(config.data.window, 100);
        assert!(config.session_options().parallel);
        assert_eq!(config.session_options().fallback_seed, Some(9));
        assert_eq!(config.fallback.profile("AAPL").unwrap().base, 10.0);
        assert_eq!(config.logging.level, "info");
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/quantfolio.toml")).is_err());
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_symbol_list_from_env_without_file() {
        let config = load_with(
            None,
            env(&[
                ("QUANTFOLIO__DATA__SYMBOLS", "aapl,msft"),
                ("QUANTFOLIO__DATA__PARALLEL", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.universe().symbols(), ["AAPL", "MSFT"]);
        assert!(config.data.parallel);
        assert_eq!(config.data.window, 100);
    }

    #[test]
    fn test_symbol_list_from_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[data]\nsymbols = [\"TSLA\"]").unwrap();

        let config = load_with(
            Some(file.path()),
            env(&[("QUANTFOLIO__DATA__SYMBOLS", "NVDA,META")]),
        )
        .unwrap();
        assert_eq!(config.universe().symbols(), ["NVDA", "META"]);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config_or_default(Path::new("/nonexistent/quantfolio.toml")).unwrap();
        assert_eq!(config.universe().len(), 7);
    }
}
