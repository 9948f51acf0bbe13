use crate::{
    commands::Commands,
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use connectors::{
    env::EnvVars, pool::PoolSettings, registry::PoolRegistry, source::MySqlTableSource,
};
use engine::{error::ScanError, handler::JsonLineHandler, scan::TableScan};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod shutdown;

#[derive(Parser)]
#[command(name = "rowsweep", version, about = "Batched keyset table scanner for MySQL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "rowsweep failed");
            ExitCode::GeneralError
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut vars = EnvVars::from_process();
    if Path::new(".env").exists() {
        vars.load_dotenv(".env")?;
    }
    let registry = PoolRegistry::new(vars, PoolSettings::default());

    let code = match cli.command {
        Commands::Scan {
            table,
            env,
            batch_size,
            id_column,
            start_after,
            json,
        } => {
            let env = env.unwrap_or_else(|| registry.default_env());
            let adapter = registry.adapter(&env)?;
            let source = MySqlTableSource::new(adapter, &table, &id_column)?;

            let cancel = CancellationToken::new();
            ShutdownCoordinator::new(cancel.clone()).register_handlers();

            let scan = TableScan::new(batch_size)
                .id_column(id_column.as_str())
                .start_after(start_after)
                .with_cancel(cancel);

            match scan.run(&source, &mut JsonLineHandler).await {
                Ok(summary) => {
                    if json {
                        let report = serde_json::to_string_pretty(&summary)
                            .map_err(CliError::JsonSerialize)?;
                        println!("{report}");
                    } else {
                        info!(
                            pages = summary.pages,
                            rows = summary.rows,
                            cursor = summary.last_cursor,
                            took_ms = summary.took_ms as u64,
                            "scan complete"
                        );
                    }
                    ExitCode::Success
                }
                Err(ScanError::Cancelled) => {
                    info!("scan cancelled by operator");
                    ExitCode::ShutdownRequested
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::TestConn { env } => {
            let env = env.unwrap_or_else(|| registry.default_env());
            let adapter = registry.adapter(&env)?;
            adapter.ping().await?;
            info!(env = %env, "connection OK");
            ExitCode::Success
        }
    };

    registry.shutdown().await;
    Ok(code)
}
