use thiserror::Error;

/// Errors raised while resolving environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested environment has no registered database configuration.
    #[error("no database configuration for environment '{env}' (known: {known:?})")]
    UnknownEnvironment { env: String, known: Vec<String> },

    /// A configuration variable holds a value of the wrong shape.
    #[error("invalid value for {var}: {source}")]
    InvalidValue {
        var: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Reading an env file from disk failed.
    #[error("failed to read env file {path}: {source}")]
    EnvFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An env file line did not match KEY=VALUE.
    #[error("malformed env file line {line}: expected KEY=VALUE")]
    EnvFileParse { line: usize },
}

/// Errors happening during pool construction or connection acquisition.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pool construction was rejected before any connection was attempted.
    #[error("failed to create connection pool: {0}")]
    Creation(String),

    /// The pool is non-blocking and stayed at capacity past the acquire
    /// timeout.
    #[error("connection pool exhausted after {waited_ms}ms")]
    Exhausted { waited_ms: u64 },

    /// Any underlying driver failure while handing out a connection.
    #[error("failed to acquire connection: {0}")]
    Connection(#[from] mysql_async::Error),
}

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any MySQL driver error.
    #[error("SQL error: {0}")]
    Sql(#[from] mysql_async::Error),

    #[error(transparent)]
    Pool(#[from] PoolError),

    /// An identifier was about to be substituted into SQL text but is not
    /// part of the trusted grammar.
    #[error("unsafe SQL identifier: '{0}'")]
    UnsafeIdentifier(String),

    #[error("unexpected result: {0}")]
    Unexpected(String),
}
