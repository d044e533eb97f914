mod args;

pub use args::{Cli, NfsExportCommand, OutputFormat, ResourceCommand, SnapshotCommand};
