//! Resource and data source handlers.
//!
//! Every handler follows the same sequence: validate the plan, copy it into a
//! request DTO, call the API, copy the response back into state. Failures come
//! back as a [`Diagnostic`].

pub mod nfs_export;
pub mod snapshot;

use async_trait::async_trait;

use crate::diagnostics::Diagnostic;
use crate::sync::{FieldPath, Value};

pub use nfs_export::{NfsExportDataSource, NfsExportFilter, NfsExportResource, NfsExportState};
pub use snapshot::{SnapshotDataSource, SnapshotFilter, SnapshotResource, SnapshotState};

#[async_trait]
pub trait ManagedResource: Send + Sync {
    type State: Send + Sync;

    fn type_name(&self) -> &'static str;

    async fn create(&self, plan: &Self::State) -> Result<Self::State, Diagnostic>;

    /// `None` when the remote object no longer exists and should be dropped
    /// from state.
    async fn read(&self, state: &Self::State) -> Result<Option<Self::State>, Diagnostic>;

    async fn update(
        &self,
        state: &Self::State,
        plan: &Self::State,
    ) -> Result<Self::State, Diagnostic>;

    async fn delete(&self, state: &Self::State) -> Result<(), Diagnostic>;

    async fn import(&self, id: &str) -> Result<Self::State, Diagnostic>;
}

#[async_trait]
pub trait DataSource: Send + Sync {
    type Filter: Send + Sync;
    type State: Send + Sync;

    fn type_name(&self) -> &'static str;

    async fn read(&self, filter: &Self::Filter) -> Result<Vec<Self::State>, Diagnostic>;
}

/// Parses the numeric API id stored as the string `id` attribute.
pub(crate) fn parse_id(id: &Value<String>, summary: &str) -> Result<i64, Diagnostic> {
    let raw = id.as_known().ok_or_else(|| {
        Diagnostic::error(summary, "id is not set in state").with_attribute("id")
    })?;
    crate::sync::Convert::<i64>::convert(raw, &FieldPath::root().child("id"))
        .map_err(|e| Diagnostic::conversion(summary, &e))
}
