mod cli;
mod output;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, NfsExportCommand, ResourceCommand, SnapshotCommand};
use scalesync::resources::{NfsExportFilter, SnapshotFilter};
use scalesync::{DataSource, ManagedResource, ScaleProvider};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.output;
    let config = cli.connection.to_config()?;
    let provider = ScaleProvider::configure(&config)?;

    let rendered = match cli.command {
        ResourceCommand::NfsExports { command } => match command {
            NfsExportCommand::List(args) => {
                let filter = NfsExportFilter {
                    zone: args.zone,
                    path: args.path,
                };
                let exports = provider.nfs_export_data_source().read(&filter).await?;
                tracing::info!(count = exports.len(), "listing complete");
                output::render_nfs_exports(&exports, format)?
            }
            NfsExportCommand::Import(args) => {
                let state = provider.nfs_export_resource().import(&args.id).await?;
                output::render_nfs_exports(std::slice::from_ref(&state), format)?
            }
        },
        ResourceCommand::Snapshots { command } => match command {
            SnapshotCommand::List(args) => {
                let filter = SnapshotFilter {
                    path: args.path,
                    name: args.name,
                };
                let snapshots = provider.snapshot_data_source().read(&filter).await?;
                tracing::info!(count = snapshots.len(), "listing complete");
                output::render_snapshots(&snapshots, format)?
            }
            SnapshotCommand::Import(args) => {
                let state = provider.snapshot_resource().import(&args.id).await?;
                output::render_snapshots(std::slice::from_ref(&state), format)?
            }
        },
    };

    println!("{}", rendered);
    Ok(())
}
