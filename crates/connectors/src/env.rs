use crate::error::ConfigError;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Variable selecting the active environment when none is passed.
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Fallback environment name when `APP_ENV` is unset.
pub const FALLBACK_ENV: &str = "AAAA";

const DB_VAR_PREFIX: &str = "DB_";
const DB_VAR_SUFFIXES: [&str; 5] = ["_HOST", "_PORT", "_USER", "_PASSWORD", "_NAME"];

/// Snapshot of configuration variables, loaded from the process environment
/// and optionally overlaid with a .env file. An explicit object rather than
/// ambient global state, so tests can construct their own.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        EnvVars {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_map(vars: HashMap<String, String>) -> Self {
        EnvVars { vars }
    }

    /// Overlays variables from a .env file on top of the snapshot.
    pub fn load_dotenv<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::EnvFileRead {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_dotenv(&content)
    }

    fn parse_dotenv(&mut self, content: &str) -> Result<(), ConfigError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(eq_pos) = line.find('=') else {
                return Err(ConfigError::EnvFileParse { line: line_num + 1 });
            };
            let key = line[..eq_pos].trim();
            if key.is_empty() {
                return Err(ConfigError::EnvFileParse { line: line_num + 1 });
            }
            let value = unquote(line[eq_pos + 1..].trim());
            self.vars.insert(key.to_string(), value);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Active environment name: `APP_ENV`, upper-cased, or the fallback.
    pub fn default_env(&self) -> String {
        self.get(APP_ENV_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or(FALLBACK_ENV)
            .to_uppercase()
    }

    /// Environment names for which at least one `DB_<ENV>_*` variable is
    /// set. This is the set of environments "known to the configuration
    /// source".
    pub fn database_envs(&self) -> Vec<String> {
        let mut envs = BTreeSet::new();
        for key in self.vars.keys() {
            let Some(rest) = key.strip_prefix(DB_VAR_PREFIX) else {
                continue;
            };
            for suffix in DB_VAR_SUFFIXES {
                if let Some(env) = rest.strip_suffix(suffix)
                    && !env.is_empty()
                {
                    envs.insert(env.to_string());
                }
            }
        }
        envs.into_iter().collect()
    }
}

fn unquote(value: &str) -> String {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        return value[1..value.len() - 1].to_string();
    }
    value.to_string()
}

/// Connection parameters for one named environment. Immutable once built.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Builds the configuration for `env` from `DB_<ENV>_*` variables.
    /// Fails if the environment is unknown to the snapshot.
    pub fn from_env(vars: &EnvVars, env: &str) -> Result<Self, ConfigError> {
        let env = env.to_uppercase();
        let known = vars.database_envs();
        if !known.contains(&env) {
            return Err(ConfigError::UnknownEnvironment { env, known });
        }

        let var = |suffix: &str| format!("{DB_VAR_PREFIX}{env}{suffix}");
        let port_var = var("_PORT");
        let port = match vars.get(&port_var) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidValue {
                    var: port_var,
                    source,
                })?,
            None => 3306,
        };

        Ok(DbConfig {
            host: vars.get(&var("_HOST")).unwrap_or("127.0.0.1").to_string(),
            port,
            user: vars.get(&var("_USER")).unwrap_or("root").to_string(),
            password: vars.get(&var("_PASSWORD")).unwrap_or_default().to_string(),
            database: vars.get(&var("_NAME")).unwrap_or_default().to_string(),
            charset: "utf8mb4".to_string(),
            connect_timeout: Duration::from_secs(10),
        })
    }
}
