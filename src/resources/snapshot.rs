use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, ManagedResource, parse_id};
use crate::api::{
    ArrayApi, DEFAULT_PAGE_LIMIT, Snapshot, SnapshotCreateParams, SnapshotQuery,
    SnapshotUpdateParams,
};
use crate::diagnostics::{Diagnostic, ensure_unchanged};
use crate::pagination::collect_pages;
use crate::sync::{Value, to_dto, to_state};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotState {
    pub id: Value<String>,
    pub name: Value<String>,
    pub path: Value<String>,
    pub alias: Value<String>,
    /// Unix timestamp; null means the snapshot never expires.
    pub expires: Value<i64>,
    pub created: Value<i64>,
    pub size: Value<i64>,
    pub state: Value<String>,
}

crate::sync_fields! {
    SnapshotState => Snapshot {
        id => id [required],
        name => name [required],
        path => path [required],
        alias => alias,
        expires => expires,
        created => created [required],
        size => size,
        state => state,
    }
}

crate::sync_fields! {
    SnapshotState => SnapshotCreateParams {
        path => path [required],
        name => name,
        alias => alias,
        expires => expires,
    }
}

crate::sync_fields! {
    SnapshotState => SnapshotUpdateParams {
        name => name,
        alias => alias,
        expires => expires,
    }
}

fn state_from(snapshot: &Snapshot, summary: &str) -> Result<SnapshotState, Diagnostic> {
    to_state::<SnapshotState, _>(snapshot).map_err(|e| Diagnostic::conversion(summary, &e))
}

pub struct SnapshotResource {
    api: Arc<dyn ArrayApi>,
}

impl SnapshotResource {
    pub const TYPE_NAME: &'static str = "powerscale_snapshot";

    pub fn new(api: Arc<dyn ArrayApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ManagedResource for SnapshotResource {
    type State = SnapshotState;

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    async fn create(&self, plan: &SnapshotState) -> Result<SnapshotState, Diagnostic> {
        const SUMMARY: &str = "Error creating snapshot";

        let params: SnapshotCreateParams =
            to_dto(plan).map_err(|e| Diagnostic::conversion(SUMMARY, &e))?;
        if params.path.is_empty() {
            return Err(
                Diagnostic::error(SUMMARY, "path must be set to the directory to snapshot")
                    .with_attribute("path"),
            );
        }

        let snapshot = self
            .api
            .create_snapshot(&params)
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;

        tracing::info!(id = snapshot.id, name = %snapshot.name, "snapshot created");

        state_from(&snapshot, SUMMARY)
    }

    async fn read(&self, state: &SnapshotState) -> Result<Option<SnapshotState>, Diagnostic> {
        const SUMMARY: &str = "Error reading snapshot";

        let id = parse_id(&state.id, SUMMARY)?;
        match self.api.get_snapshot(id).await {
            Ok(snapshot) => state_from(&snapshot, SUMMARY).map(Some),
            Err(e) if e.is_not_found() => {
                tracing::warn!(id, "snapshot no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(Diagnostic::api(SUMMARY, &e)),
        }
    }

    async fn update(
        &self,
        state: &SnapshotState,
        plan: &SnapshotState,
    ) -> Result<SnapshotState, Diagnostic> {
        const SUMMARY: &str = "Error updating snapshot";

        ensure_unchanged("path", &state.path, &plan.path)?;
        let id = parse_id(&state.id, SUMMARY)?;
        let params: SnapshotUpdateParams =
            to_dto(plan).map_err(|e| Diagnostic::conversion(SUMMARY, &e))?;

        self.api
            .update_snapshot(id, &params)
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;

        tracing::info!(id, clears_expiry = params.expires.is_null(), "snapshot updated");

        let snapshot = self
            .api
            .get_snapshot(id)
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;
        state_from(&snapshot, SUMMARY)
    }

    async fn delete(&self, state: &SnapshotState) -> Result<(), Diagnostic> {
        const SUMMARY: &str = "Error deleting snapshot";

        let id = parse_id(&state.id, SUMMARY)?;
        match self.api.delete_snapshot(id).await {
            Ok(()) => {
                tracing::info!(id, "snapshot deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id, "snapshot already deleted");
                Ok(())
            }
            Err(e) => Err(Diagnostic::api(SUMMARY, &e)),
        }
    }

    async fn import(&self, id: &str) -> Result<SnapshotState, Diagnostic> {
        const SUMMARY: &str = "Error importing snapshot";

        let id = parse_id(&Value::from(id), SUMMARY)?;
        let snapshot = self
            .api
            .get_snapshot(id)
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;

        tracing::info!(id, "snapshot imported");
        state_from(&snapshot, SUMMARY)
    }
}

/// Client-side filter; the list endpoint has no name or path parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotFilter {
    pub path: Option<String>,
    pub name: Option<String>,
}

impl SnapshotFilter {
    fn matches(&self, snapshot: &Snapshot) -> bool {
        self.path.as_ref().is_none_or(|path| &snapshot.path == path)
            && self.name.as_ref().is_none_or(|name| &snapshot.name == name)
    }
}

pub struct SnapshotDataSource {
    api: Arc<dyn ArrayApi>,
}

impl SnapshotDataSource {
    pub const TYPE_NAME: &'static str = "powerscale_snapshot";

    pub fn new(api: Arc<dyn ArrayApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for SnapshotDataSource {
    type Filter = SnapshotFilter;
    type State = SnapshotState;

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    async fn read(&self, filter: &SnapshotFilter) -> Result<Vec<SnapshotState>, Diagnostic> {
        const SUMMARY: &str = "Error reading snapshots";

        let query = SnapshotQuery {
            limit: Some(DEFAULT_PAGE_LIMIT),
        };
        let api = self.api.as_ref();
        let query = &query;
        let snapshots = collect_pages(move |resume| api.list_snapshots(query, resume))
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;

        let states = snapshots
            .iter()
            .filter(|snapshot| filter.matches(snapshot))
            .map(|snapshot| state_from(snapshot, SUMMARY))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(total = snapshots.len(), matched = states.len(), "snapshots read");
        Ok(states)
    }
}
