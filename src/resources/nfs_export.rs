use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, ManagedResource, parse_id};
use crate::api::{
    ArrayApi, DEFAULT_PAGE_LIMIT, DEFAULT_ZONE, NfsExport, NfsExportParams, NfsExportQuery,
    NfsMapping, Persona,
};
use crate::diagnostics::{Diagnostic, ensure_unchanged};
use crate::pagination::collect_pages;
use crate::sync::{Value, to_dto, to_state};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaState {
    pub id: Value<String>,
    pub name: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfsMappingState {
    pub enabled: Value<bool>,
    pub user: Value<PersonaState>,
    pub primary_group: Value<PersonaState>,
    pub secondary_groups: Value<Vec<PersonaState>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfsExportState {
    pub id: Value<String>,
    pub zone: Value<String>,
    pub paths: Value<Vec<String>>,
    pub description: Value<String>,
    pub clients: Value<Vec<String>>,
    pub root_clients: Value<Vec<String>>,
    pub read_only: Value<bool>,
    pub security_flavors: Value<Vec<String>>,
    pub map_root: Value<NfsMappingState>,
    pub max_file_size: Value<i64>,
}

crate::sync_fields! {
    PersonaState => Persona {
        id => id,
        name => name,
    }
}

crate::sync_fields! {
    NfsMappingState => NfsMapping {
        enabled => enabled,
        user => user,
        primary_group => primary_group,
        secondary_groups => secondary_groups,
    }
}

crate::sync_fields! {
    NfsExportState => NfsExport {
        id => id [required],
        zone => zone [default = DEFAULT_ZONE.to_string()],
        paths => paths [required],
        description => description,
        clients => clients,
        root_clients => root_clients,
        read_only => read_only,
        security_flavors => security_flavors,
        map_root => map_root,
        max_file_size => max_file_size,
    }
}

crate::sync_fields! {
    NfsExportState => NfsExportParams {
        paths => paths,
        description => description,
        clients => clients,
        root_clients => root_clients,
        read_only => read_only,
        security_flavors => security_flavors,
        map_root => map_root,
        max_file_size => max_file_size,
    }
}

fn zone_of(state: &NfsExportState) -> Option<&str> {
    state.zone.as_known().map(String::as_str)
}

/// `zone` is the zone the request was scoped to. A response without a zone
/// belongs to it; the default zone only applies when neither says otherwise.
fn state_from(
    export: &NfsExport,
    zone: Option<&str>,
    summary: &str,
) -> Result<NfsExportState, Diagnostic> {
    let mut state =
        to_state::<NfsExportState, _>(export).map_err(|e| Diagnostic::conversion(summary, &e))?;
    if let (None, Some(zone)) = (&export.zone, zone) {
        state.zone = Value::Known(zone.to_string());
    }
    Ok(state)
}

/// An update may leave `paths` out, but no write may set it to an empty list.
fn validate_paths(
    params: &NfsExportParams,
    required: bool,
    summary: &str,
) -> Result<(), Diagnostic> {
    let valid = match &params.paths {
        Some(paths) => !paths.is_empty(),
        None => !required,
    };
    if valid {
        Ok(())
    } else {
        Err(
            Diagnostic::error(summary, "paths must contain at least one directory")
                .with_attribute("paths"),
        )
    }
}

pub struct NfsExportResource {
    api: Arc<dyn ArrayApi>,
}

impl NfsExportResource {
    pub const TYPE_NAME: &'static str = "powerscale_nfs_export";

    pub fn new(api: Arc<dyn ArrayApi>) -> Self {
        Self { api }
    }

    async fn read_back(
        &self,
        id: i64,
        zone: Option<&str>,
        summary: &str,
    ) -> Result<NfsExportState, Diagnostic> {
        let export = self
            .api
            .get_nfs_export(id, zone)
            .await
            .map_err(|e| Diagnostic::api(summary, &e))?;
        state_from(&export, zone, summary)
    }
}

#[async_trait]
impl ManagedResource for NfsExportResource {
    type State = NfsExportState;

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    async fn create(&self, plan: &NfsExportState) -> Result<NfsExportState, Diagnostic> {
        const SUMMARY: &str = "Error creating NFS export";

        let params: NfsExportParams =
            to_dto(plan).map_err(|e| Diagnostic::conversion(SUMMARY, &e))?;
        validate_paths(&params, true, SUMMARY)?;

        let zone = zone_of(plan);
        let id = self
            .api
            .create_nfs_export(zone, &params)
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;

        tracing::info!(id, zone = zone.unwrap_or(DEFAULT_ZONE), "NFS export created");

        self.read_back(id, zone, SUMMARY).await
    }

    async fn read(&self, state: &NfsExportState) -> Result<Option<NfsExportState>, Diagnostic> {
        const SUMMARY: &str = "Error reading NFS export";

        let id = parse_id(&state.id, SUMMARY)?;
        match self.api.get_nfs_export(id, zone_of(state)).await {
            Ok(export) => state_from(&export, zone_of(state), SUMMARY).map(Some),
            Err(e) if e.is_not_found() => {
                tracing::warn!(id, "NFS export no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(Diagnostic::api(SUMMARY, &e)),
        }
    }

    async fn update(
        &self,
        state: &NfsExportState,
        plan: &NfsExportState,
    ) -> Result<NfsExportState, Diagnostic> {
        const SUMMARY: &str = "Error updating NFS export";

        ensure_unchanged("zone", &state.zone, &plan.zone)?;
        let id = parse_id(&state.id, SUMMARY)?;
        let params: NfsExportParams =
            to_dto(plan).map_err(|e| Diagnostic::conversion(SUMMARY, &e))?;
        validate_paths(&params, false, SUMMARY)?;

        let zone = zone_of(state);
        self.api
            .update_nfs_export(id, zone, &params)
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;

        tracing::info!(id, "NFS export updated");

        self.read_back(id, zone, SUMMARY).await
    }

    async fn delete(&self, state: &NfsExportState) -> Result<(), Diagnostic> {
        const SUMMARY: &str = "Error deleting NFS export";

        let id = parse_id(&state.id, SUMMARY)?;
        match self.api.delete_nfs_export(id, zone_of(state)).await {
            Ok(()) => {
                tracing::info!(id, "NFS export deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id, "NFS export already deleted");
                Ok(())
            }
            Err(e) => Err(Diagnostic::api(SUMMARY, &e)),
        }
    }

    /// Accepts `<id>` or `<zone>:<id>`.
    async fn import(&self, id: &str) -> Result<NfsExportState, Diagnostic> {
        const SUMMARY: &str = "Error importing NFS export";

        let (zone, raw_id) = match id.split_once(':') {
            Some((zone, raw_id)) => (Some(zone), raw_id),
            None => (None, id),
        };
        let id = parse_id(&Value::from(raw_id), SUMMARY)?;
        let state = self.read_back(id, zone, SUMMARY).await?;

        tracing::info!(id, "NFS export imported");
        Ok(state)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NfsExportFilter {
    pub zone: Option<String>,
    pub path: Option<String>,
}

pub struct NfsExportDataSource {
    api: Arc<dyn ArrayApi>,
}

impl NfsExportDataSource {
    pub const TYPE_NAME: &'static str = "powerscale_nfs_export";

    pub fn new(api: Arc<dyn ArrayApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for NfsExportDataSource {
    type Filter = NfsExportFilter;
    type State = NfsExportState;

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    async fn read(&self, filter: &NfsExportFilter) -> Result<Vec<NfsExportState>, Diagnostic> {
        const SUMMARY: &str = "Error reading NFS exports";

        let query = NfsExportQuery {
            zone: filter.zone.clone(),
            path: filter.path.clone(),
            limit: Some(DEFAULT_PAGE_LIMIT),
        };
        let api = self.api.as_ref();
        let query = &query;
        let exports = collect_pages(move |resume| api.list_nfs_exports(query, resume))
            .await
            .map_err(|e| Diagnostic::api(SUMMARY, &e))?;

        tracing::info!(count = exports.len(), "NFS exports read");

        exports
            .iter()
            .map(|export| state_from(export, filter.zone.as_deref(), SUMMARY))
            .collect()
    }
}
