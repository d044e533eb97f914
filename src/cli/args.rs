use clap::{Parser, Subcommand, ValueEnum};

use scalesync::{ProviderConfig, ScaleSyncError};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(clap::Args, Debug)]
pub struct ConnectionArgs {
    #[arg(long, env = "POWERSCALE_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, env = "POWERSCALE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "POWERSCALE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "POWERSCALE_INSECURE")]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = ProviderConfig::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> Result<ProviderConfig, ScaleSyncError> {
        let endpoint = self.endpoint.clone().ok_or_else(|| {
            ScaleSyncError::Config(
                "No endpoint provided. Set POWERSCALE_ENDPOINT or use --endpoint flag"
                    .to_string(),
            )
        })?;
        let username = self.username.clone().ok_or_else(|| {
            ScaleSyncError::Config(
                "No username provided. Set POWERSCALE_USERNAME or use --username flag"
                    .to_string(),
            )
        })?;
        let password = self.password.clone().ok_or_else(|| {
            ScaleSyncError::Config(
                "No password provided. Set POWERSCALE_PASSWORD or use --password flag"
                    .to_string(),
            )
        })?;

        Ok(ProviderConfig {
            insecure: self.insecure,
            timeout_secs: self.timeout,
            ..ProviderConfig::new(endpoint, username, password)
        })
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommand {
    NfsExports {
        #[command(subcommand)]
        command: NfsExportCommand,
    },
    Snapshots {
        #[command(subcommand)]
        command: SnapshotCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum NfsExportCommand {
    List(NfsExportListArgs),
    Import(ImportArgs),
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCommand {
    List(SnapshotListArgs),
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct NfsExportListArgs {
    #[arg(long)]
    pub zone: Option<String>,

    #[arg(long)]
    pub path: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SnapshotListArgs {
    #[arg(long)]
    pub path: Option<String>,

    #[arg(long)]
    pub name: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Object id, or `<zone>:<id>` for zone-scoped objects
    pub id: String,
}
