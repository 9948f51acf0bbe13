use crate::{
    env::{DbConfig, EnvVars},
    error::PoolError,
    pool::PoolSettings,
    sql::mysql::adapter::MySqlAdapter,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Per-environment pool cache. One registry per process, constructed at
/// startup; at most one pool ever exists per environment name.
///
/// Creation is lazy and serialized by the registry lock, so two concurrent
/// first-uses of the same environment cannot cache two distinct pools.
/// Pool construction opens no connections.
pub struct PoolRegistry {
    vars: EnvVars,
    settings: PoolSettings,
    pools: Mutex<HashMap<String, MySqlAdapter>>,
}

impl PoolRegistry {
    pub fn new(vars: EnvVars, settings: PoolSettings) -> Self {
        PoolRegistry {
            vars,
            settings,
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Active environment name per the configuration snapshot.
    pub fn default_env(&self) -> String {
        self.vars.default_env()
    }

    /// Returns the cached adapter for `env`, creating and caching it on
    /// first use. Unknown environments fail before any network activity.
    pub fn adapter(&self, env: &str) -> Result<MySqlAdapter, PoolError> {
        let env = env.to_uppercase();
        let mut pools = self.pools.lock().expect("pool registry lock poisoned");

        if let Some(adapter) = pools.get(&env) {
            return Ok(adapter.clone());
        }

        let config = DbConfig::from_env(&self.vars, &env)?;
        let adapter = match MySqlAdapter::connect(&config, &self.settings) {
            Ok(adapter) => adapter,
            Err(err) => {
                error!(env = %env, error = %err, "failed to create connection pool");
                return Err(err);
            }
        };

        pools.insert(env.clone(), adapter.clone());
        info!(env = %env, host = %config.host, "created MySQL connection pool");
        Ok(adapter)
    }

    /// Number of pools created so far.
    pub fn pool_count(&self) -> usize {
        self.pools.lock().expect("pool registry lock poisoned").len()
    }

    /// Disconnects every pool. Call once at process shutdown.
    pub async fn shutdown(&self) {
        let pools: Vec<(String, MySqlAdapter)> = {
            let mut guard = self.pools.lock().expect("pool registry lock poisoned");
            guard.drain().collect()
        };

        for (env, adapter) in pools {
            if let Err(err) = adapter.disconnect().await {
                warn!(env = %env, error = %err, "error while closing connection pool");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::collections::HashMap;

    fn registry(pairs: &[(&str, &str)]) -> PoolRegistry {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PoolRegistry::new(EnvVars::from_map(vars), PoolSettings::default())
    }

    #[test]
    fn unknown_environment_fails_before_any_connection() {
        let registry = registry(&[("DB_STAGE_HOST", "db.stage")]);
        let err = registry.adapter("unknown_env").unwrap_err();
        assert!(matches!(
            err,
            PoolError::Config(ConfigError::UnknownEnvironment { .. })
        ));
        assert_eq!(registry.pool_count(), 0);
    }

    #[test]
    fn one_pool_per_environment() {
        // pool construction is lazy, so no database is needed here
        let registry = registry(&[("DB_STAGE_HOST", "db.stage")]);
        registry.adapter("stage").unwrap();
        registry.adapter("STAGE").unwrap();
        assert_eq!(registry.pool_count(), 1);
    }
}
