use serde::Serialize;
use tabled::{Table, Tabled};

use scalesync::resources::{NfsExportState, SnapshotState};
use scalesync::{ScaleSyncError, Value};

use crate::cli::OutputFormat;

#[derive(Tabled)]
struct NfsExportRow {
    id: String,
    zone: String,
    paths: String,
    clients: String,
    read_only: String,
    description: String,
}

#[derive(Tabled)]
struct SnapshotRow {
    id: String,
    name: String,
    path: String,
    state: String,
    expires: String,
    size: String,
}

fn joined(values: &Value<Vec<String>>) -> String {
    match values {
        Value::Known(values) => values.join(", "),
        Value::Unknown => "(known after apply)".to_string(),
        Value::Null => String::new(),
    }
}

fn render_json<T: Serialize>(items: &[T]) -> Result<String, ScaleSyncError> {
    Ok(serde_json::to_string_pretty(items)?)
}

pub fn render_nfs_exports(
    exports: &[NfsExportState],
    format: OutputFormat,
) -> Result<String, ScaleSyncError> {
    match format {
        OutputFormat::Json => render_json(exports),
        OutputFormat::Table => {
            let rows = exports.iter().map(|export| NfsExportRow {
                id: export.id.to_string(),
                zone: export.zone.to_string(),
                paths: joined(&export.paths),
                clients: joined(&export.clients),
                read_only: export.read_only.to_string(),
                description: export.description.to_string(),
            });
            Ok(Table::new(rows).to_string())
        }
    }
}

pub fn render_snapshots(
    snapshots: &[SnapshotState],
    format: OutputFormat,
) -> Result<String, ScaleSyncError> {
    match format {
        OutputFormat::Json => render_json(snapshots),
        OutputFormat::Table => {
            let rows = snapshots.iter().map(|snapshot| SnapshotRow {
                id: snapshot.id.to_string(),
                name: snapshot.name.to_string(),
                path: snapshot.path.to_string(),
                state: snapshot.state.to_string(),
                expires: match &snapshot.expires {
                    Value::Null => "never".to_string(),
                    other => other.to_string(),
                },
                size: snapshot.size.to_string(),
            });
            Ok(Table::new(rows).to_string())
        }
    }
}
