use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a table in batches, emitting each row as a JSON line
    Scan {
        #[arg(long, help = "Table to scan")]
        table: String,

        #[arg(long, help = "Environment name (defaults to APP_ENV)")]
        env: Option<String>,

        #[arg(long, default_value_t = 100, help = "Rows per page")]
        batch_size: usize,

        #[arg(
            long,
            default_value = "id",
            help = "Identifier column used for keyset paging"
        )]
        id_column: String,

        #[arg(
            long,
            default_value_t = 0,
            help = "Resume after this identifier value"
        )]
        start_after: u64,

        #[arg(long, help = "Print the final scan summary as JSON")]
        json: bool,
    },
    /// Test connectivity for an environment
    TestConn {
        #[arg(long, help = "Environment name (defaults to APP_ENV)")]
        env: Option<String>,
    },
}
