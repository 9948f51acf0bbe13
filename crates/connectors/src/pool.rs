use crate::error::PoolError;
use mysql_async::{PoolConstraints, PoolOpts};
use std::time::Duration;

/// Tuning parameters for one environment's connection pool. Defaults match
/// a small always-on worker: a couple of warm connections, a hard cap of
/// ten, and blocking acquisition.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Connections kept open even when idle.
    pub min_connections: usize,
    /// Hard cap on concurrently open connections.
    pub max_connections: usize,
    /// When at capacity: wait for a free connection, or fail after
    /// `acquire_timeout`.
    pub block_on_exhausted: bool,
    pub acquire_timeout: Duration,
    /// Idle connections above the minimum are closed after this long.
    pub idle_ttl: Duration,
    /// Forced recycle age for every connection, regardless of use.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            min_connections: 2,
            max_connections: 10,
            block_on_exhausted: true,
            acquire_timeout: Duration::from_secs(30),
            idle_ttl: Duration::from_secs(600),
            max_lifetime: None,
        }
    }
}

impl PoolSettings {
    pub fn with_connections(mut self, min: usize, max: usize) -> Self {
        self.min_connections = min;
        self.max_connections = max;
        self
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.block_on_exhausted = blocking;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = Some(lifetime);
        self
    }

    /// Renders the settings into driver pool options. The driver owns
    /// liveness checking: connections are reset on check-in and stale ones
    /// are dropped.
    pub fn pool_opts(&self) -> Result<PoolOpts, PoolError> {
        let constraints =
            PoolConstraints::new(self.min_connections, self.max_connections).ok_or_else(|| {
                PoolError::Creation(format!(
                    "invalid pool bounds: min {} exceeds max {}",
                    self.min_connections, self.max_connections
                ))
            })?;

        let mut opts = PoolOpts::default()
            .with_constraints(constraints)
            .with_inactive_connection_ttl(self.idle_ttl);
        if self.max_lifetime.is_some() {
            opts = opts.with_abs_conn_ttl(self.max_lifetime);
        }
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded_and_blocking() {
        let settings = PoolSettings::default();
        assert_eq!(settings.min_connections, 2);
        assert_eq!(settings.max_connections, 10);
        assert!(settings.block_on_exhausted);
        assert!(settings.pool_opts().is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let settings = PoolSettings::default().with_connections(20, 5);
        assert!(matches!(settings.pool_opts(), Err(PoolError::Creation(_))));
    }

    #[test]
    fn builder_overrides_merge_over_defaults() {
        let settings = PoolSettings::default()
            .with_connections(1, 4)
            .with_blocking(false)
            .with_acquire_timeout(Duration::from_secs(5));
        assert_eq!(settings.max_connections, 4);
        assert!(!settings.block_on_exhausted);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(5));
        assert_eq!(settings.idle_ttl, Duration::from_secs(600));
    }
}
