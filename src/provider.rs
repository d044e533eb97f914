use std::sync::Arc;

use crate::api::{ArrayApi, ArrayClient};
use crate::config::ProviderConfig;
use crate::error::ScaleSyncError;
use crate::resources::{
    NfsExportDataSource, NfsExportResource, SnapshotDataSource, SnapshotResource,
};

/// Configured provider: owns the API client shared by every resource and data
/// source handler.
#[derive(Clone)]
pub struct ScaleProvider {
    api: Arc<dyn ArrayApi>,
}

impl ScaleProvider {
    pub const NAME: &'static str = "powerscale";

    pub fn configure(config: &ProviderConfig) -> Result<Self, ScaleSyncError> {
        config.validate()?;
        let client = ArrayClient::new(config)?;

        tracing::info!(
            endpoint = %config.endpoint,
            insecure = config.insecure,
            "provider configured"
        );

        Ok(Self::with_api(Arc::new(client)))
    }

    pub fn with_api(api: Arc<dyn ArrayApi>) -> Self {
        Self { api }
    }

    pub fn nfs_export_resource(&self) -> NfsExportResource {
        NfsExportResource::new(self.api.clone())
    }

    pub fn nfs_export_data_source(&self) -> NfsExportDataSource {
        NfsExportDataSource::new(self.api.clone())
    }

    pub fn snapshot_resource(&self) -> SnapshotResource {
        SnapshotResource::new(self.api.clone())
    }

    pub fn snapshot_data_source(&self) -> SnapshotDataSource {
        SnapshotDataSource::new(self.api.clone())
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        vec![NfsExportResource::TYPE_NAME, SnapshotResource::TYPE_NAME]
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        vec![NfsExportDataSource::TYPE_NAME, SnapshotDataSource::TYPE_NAME]
    }
}

impl std::fmt::Debug for ScaleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaleProvider")
            .field("name", &Self::NAME)
            .finish()
    }
}
