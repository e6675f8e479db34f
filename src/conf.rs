pub mod properties;

use config::{Config, ConfigError, Environment, Source, Value};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use properties::read_properties_from_file;

/// environment prefix for every recognized option, `PORTAL_RM__URL` -> `rm.url`
pub static ENV_PREFIX: &str = "PORTAL";

/// environment snapshot accepted in place of the process environment
pub type EnvSnapshot = config::Map<String, String>;

/// Portal settings, immutable once loaded.
/// Built from properties files and the environment, then shared by reference.
/// # Fields
/// * `name` - application name, also the log file prefix
/// * `debug` - debug mode
/// * `web` - http listener
/// * `rm` - resource manager backend
/// * `scheduler` - listing views
/// * `log` - logging
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    pub debug: bool,
    pub web: Web,
    pub rm: Rm,
    pub scheduler: Scheduler,
    pub log: Log,
}

/// Web listener config
/// # Fields
/// * `bind` - bind address
/// * `port` - bind port
/// * `upload_max_size` - multipart body limit in bytes
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Web {
    pub bind: String,
    pub port: u16,
    pub upload_max_size: usize,
}

/// Resource Manager REST backend
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Rm {
    pub url: String,
    pub timeout_secs: u64,
    pub nodes_recoverable: bool,
}

/// Listing views
/// * `tasks_page_size` - items per page in the task list
/// * `fetch_timeout_secs` - how long navigation stays disabled waiting for a fetch
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Scheduler {
    pub tasks_page_size: u64,
    pub fetch_timeout_secs: u64,
}

/// Log config
/// # Fields
/// * `level` - EnvFilter directives
/// * `console` - log to stdout
/// * `dirs` - daily rolling log directory, empty disables file logging
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Log {
    pub level: String,
    pub console: bool,
    pub dirs: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            name: "gridportal".to_string(),
            debug: false,
            web: Default::default(),
            rm: Default::default(),
            scheduler: Default::default(),
            log: Default::default(),
        }
    }
}

impl Default for Web {
    fn default() -> Self {
        Web { bind: "0.0.0.0".to_string(), port: 8080, upload_max_size: 1024 * 1024 }
    }
}

impl Default for Rm {
    fn default() -> Self {
        Rm { url: "http://localhost:8080/rest/rm".to_string(), timeout_secs: 10, nodes_recoverable: true }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler { tasks_page_size: 50, fetch_timeout_secs: 30 }
    }
}

impl Default for Log {
    fn default() -> Self {
        Log { level: "info".to_string(), console: true, dirs: String::new() }
    }
}

impl Web {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Scheduler {
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// config files for the current process
/// `PORTAL_CONFIG_PATH` (default `config`) holds `portal.properties`
/// and `{PORTAL_RUN_MODE}.properties` (run mode defaults to `development`)
pub fn config_files() -> Vec<PathBuf> {
    let config_path = std::env::var("PORTAL_CONFIG_PATH").unwrap_or("config".to_string());
    let run_mode = std::env::var("PORTAL_RUN_MODE").unwrap_or("development".to_string());

    let dir = PathBuf::from(config_path);
    vec![dir.join("portal.properties"), dir.join(format!("{run_mode}.properties"))]
}

/// Settings together with what had to be ignored while reading them.
/// Warnings are returned rather than logged, loading happens before logging exists.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub settings: Settings,
    pub warnings: Vec<String>,
}

impl Settings {
    /// load settings from `config_files()` and the process environment
    pub fn load() -> Loaded {
        Self::from_sources(&config_files(), None)
    }

    /// Merge `files` (later wins) and the environment into settings.
    /// `env` replaces the process environment when given.
    /// Never fails: a value that does not fit its option is skipped with a
    /// warning and the option keeps the value from earlier sources.
    pub fn from_sources(files: &[PathBuf], env: Option<EnvSnapshot>) -> Loaded {
        let mut warnings = Vec::new();
        let mut candidates: Vec<(String, String, Value)> = Vec::new();

        for file in files {
            let parsed = properties::load(file);
            warnings.extend(parsed.warnings);
            let origin = file.display().to_string();
            for (key, value) in parsed.pairs {
                candidates.push((origin.clone(), key, Value::new(Some(&origin), value)));
            }
        }

        let environment = Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__").source(env);
        match environment.collect() {
            Ok(collected) => {
                let mut collected: Vec<(String, Value)> = collected.into_iter().collect();
                collected.sort_by(|a, b| a.0.cmp(&b.0));
                candidates.extend(collected.into_iter().map(|(key, value)| ("environment".to_string(), key, value)));
            },
            Err(err) => warnings.push(format!("environment could not be read: {}", err)),
        }

        let mut accepted: Vec<(String, Value)> = Vec::new();
        let mut settings = Settings::default();
        for (origin, key, value) in candidates {
            accepted.push((key.clone(), value));
            match Self::overlay(&accepted) {
                Ok(next) => settings = next,
                Err(err) => {
                    accepted.pop();
                    warnings.push(format!("ignoring {} from {}: {}", key, origin, err));
                },
            }
        }

        Loaded { settings, warnings }
    }

    fn overlay(pairs: &[(String, Value)]) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(key.as_str(), value.clone())?;
        }
        builder.build()?.try_deserialize::<Settings>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn properties(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn from_file(file: &tempfile::NamedTempFile, env: EnvSnapshot) -> Loaded {
        Settings::from_sources(&[file.path().to_path_buf()], Some(env))
    }

    #[test]
    fn test_defaults_without_sources() {
        let loaded = Settings::from_sources(&[], Some(EnvSnapshot::new()));
        assert!(loaded.warnings.is_empty());
        let settings = loaded.settings;
        assert_eq!(settings.name, "gridportal");
        assert_eq!(settings.web.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.web.upload_max_size, 1048576);
        assert_eq!(settings.scheduler.tasks_page_size, 50);
        assert_eq!(settings.scheduler.fetch_timeout(), std::time::Duration::from_secs(30));
    }

    #[test]
    fn test_missing_file_is_not_fatal() {
        let loaded = Settings::from_sources(&[PathBuf::from("/nowhere/portal.properties")], Some(EnvSnapshot::new()));
        assert_eq!(loaded.settings.rm.url, "http://localhost:8080/rest/rm");
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("/nowhere/portal.properties"));
    }

    #[test]
    fn test_file_values_are_recognized() {
        let file = properties("# portal\nname=portal-test\nweb.port=9090\nrm.url=http://rm.example:8080/rest/rm\nscheduler.tasks_page_size = 20\nlog.console=false\n");
        let settings = from_file(&file, EnvSnapshot::new()).settings;
        assert_eq!(settings.name, "portal-test");
        assert_eq!(settings.web.port, 9090);
        assert_eq!(settings.rm.url, "http://rm.example:8080/rest/rm");
        assert_eq!(settings.scheduler.tasks_page_size, 20);
        assert!(!settings.log.console);
    }

    #[test]
    fn test_later_file_and_environment_override() {
        let base = properties("web.port=9090\nrm.timeout_secs=5\n");
        let mode = properties("web.port=9191\n");
        let mut env = EnvSnapshot::new();
        env.insert("PORTAL_RM__TIMEOUT_SECS".to_string(), "42".to_string());
        env.insert("UNRELATED".to_string(), "x".to_string());

        let settings = Settings::from_sources(&[base.path().to_path_buf(), mode.path().to_path_buf()], Some(env)).settings;
        assert_eq!(settings.web.port, 9191);
        assert_eq!(settings.rm.timeout_secs, 42);
    }

    #[test]
    fn test_unusable_value_keeps_earlier_value() {
        let base = properties("web.port=9090\n");
        let mode = properties("web.port=not-a-port\nname=mode\n");
        let loaded = Settings::from_sources(&[base.path().to_path_buf(), mode.path().to_path_buf()], Some(EnvSnapshot::new()));
        assert_eq!(loaded.settings.web.port, 9090);
        assert_eq!(loaded.settings.name, "mode");
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].starts_with("ignoring web.port from "));
    }

    #[test]
    fn test_bad_environment_value_does_not_reset_file_values() {
        let file = properties("web.port=9090\n");
        let mut env = EnvSnapshot::new();
        env.insert("PORTAL_DEBUG".to_string(), "maybe".to_string());
        env.insert("PORTAL_RM__URL".to_string(), "http://rm.env/rest/rm".to_string());

        let loaded = from_file(&file, env);
        assert_eq!(loaded.settings.web.port, 9090);
        assert!(!loaded.settings.debug);
        assert_eq!(loaded.settings.rm.url, "http://rm.env/rest/rm");
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].starts_with("ignoring debug from environment"));
    }

    #[test]
    fn test_malformed_line_keeps_rest_of_file() {
        let file = properties("web.port=9090\nrm.url=http://rm.example/rest/rm\nbad=\\u12\n");
        let loaded = from_file(&file, EnvSnapshot::new());
        assert_eq!(loaded.settings.web.port, 9090);
        assert_eq!(loaded.settings.rm.url, "http://rm.example/rest/rm");
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("line 3 skipped: Malformed"));
    }
}
