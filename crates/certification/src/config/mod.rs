use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// How log lines are laid out on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// Message and fields only.
    Compact,
    /// Adds module target and source line.
    Detailed,
}

impl LogStyle {
    pub fn for_environment(environment: AppEnvironment) -> Self {
        match environment {
            AppEnvironment::Development => Self::Detailed,
            AppEnvironment::Test | AppEnvironment::Production => Self::Compact,
        }
    }
}

/// Output flavour for generated letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterFormat {
    #[default]
    Text,
    Json,
}

impl LetterFormat {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub roster: RosterConfig,
    pub letters: LetterConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let input = env::var("CERT_INPUT").unwrap_or_else(|_| "Data/Data.csv".to_string());
        let output_dir = env::var("CERT_OUTPUT_DIR").unwrap_or_else(|_| "Output".to_string());
        let template = env::var("CERT_TEMPLATE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let format = match env::var("CERT_FORMAT") {
            Ok(value) => LetterFormat::parse(&value)?,
            Err(_) => LetterFormat::default(),
        };

        let log_level = env::var("CERT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            roster: RosterConfig {
                input: PathBuf::from(input),
            },
            letters: LetterConfig {
                output_dir: PathBuf::from(output_dir),
                template,
                format,
            },
            telemetry: TelemetryConfig {
                log_level,
                style: LogStyle::for_environment(environment),
            },
        })
    }
}

/// Where the roster export is read from.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub input: PathBuf,
}

/// Settings controlling letter generation.
#[derive(Debug, Clone)]
pub struct LetterConfig {
    pub output_dir: PathBuf,
    pub template: Option<PathBuf>,
    pub format: LetterFormat,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub style: LogStyle,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFormat { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFormat { value } => {
                write!(f, "CERT_FORMAT must be 'text' or 'json' (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("CERT_INPUT");
        env::remove_var("CERT_OUTPUT_DIR");
        env::remove_var("CERT_TEMPLATE");
        env::remove_var("CERT_FORMAT");
        env::remove_var("CERT_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.roster.input, PathBuf::from("Data/Data.csv"));
        assert_eq!(config.letters.output_dir, PathBuf::from("Output"));
        assert!(config.letters.template.is_none());
        assert_eq!(config.letters.format, LetterFormat::Text);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.style, LogStyle::Detailed);
    }

    #[test]
    fn load_reads_overrides_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("CERT_INPUT", "roster.csv");
        env::set_var("CERT_TEMPLATE", "letter.txt");
        env::set_var("CERT_FORMAT", "json");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.roster.input, PathBuf::from("roster.csv"));
        assert_eq!(config.letters.template, Some(PathBuf::from("letter.txt")));
        assert_eq!(config.letters.format, LetterFormat::Json);
        assert_eq!(config.telemetry.style, LogStyle::Compact);
    }

    #[test]
    fn load_rejects_unknown_format() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CERT_FORMAT", "pdf");
        let error = AppConfig::load().expect_err("pdf is not a letter format");
        reset_env();

        assert!(error.to_string().contains("pdf"));
    }

    #[test]
    fn environment_parsing_defaults_to_development() {
        assert_eq!(AppEnvironment::from_str("prod"), AppEnvironment::Production);
        assert_eq!(AppEnvironment::from_str(" CI "), AppEnvironment::Test);
        assert_eq!(
            AppEnvironment::from_str("staging"),
            AppEnvironment::Development
        );
    }
}
