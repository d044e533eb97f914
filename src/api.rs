//! REST API seam.
//!
//! Resource handlers only see [`ArrayApi`]; [`ArrayClient`] is the HTTP
//! implementation and tests substitute their own.

mod client;
mod error;
mod types;

pub use client::ArrayClient;
pub use error::ApiError;
pub use types::{
    CreateResponse, DEFAULT_PAGE_LIMIT, DEFAULT_ZONE, ErrorEnvelope, ErrorItem, NfsExport,
    NfsExportList, NfsExportParams, NfsExportQuery, NfsMapping, Persona, SecurityFlavor, Snapshot,
    SnapshotCreateParams, SnapshotList, SnapshotQuery, SnapshotUpdateParams,
};

use async_trait::async_trait;

use crate::pagination::Page;

#[async_trait]
pub trait ArrayApi: Send + Sync {
    async fn list_nfs_exports(
        &self,
        query: &NfsExportQuery,
        resume: Option<String>,
    ) -> Result<Page<NfsExport>, ApiError>;

    async fn get_nfs_export(&self, id: i64, zone: Option<&str>) -> Result<NfsExport, ApiError>;

    /// Returns the id of the new export.
    async fn create_nfs_export(
        &self,
        zone: Option<&str>,
        params: &NfsExportParams,
    ) -> Result<i64, ApiError>;

    async fn update_nfs_export(
        &self,
        id: i64,
        zone: Option<&str>,
        params: &NfsExportParams,
    ) -> Result<(), ApiError>;

    async fn delete_nfs_export(&self, id: i64, zone: Option<&str>) -> Result<(), ApiError>;

    async fn list_snapshots(
        &self,
        query: &SnapshotQuery,
        resume: Option<String>,
    ) -> Result<Page<Snapshot>, ApiError>;

    async fn get_snapshot(&self, id: i64) -> Result<Snapshot, ApiError>;

    async fn create_snapshot(&self, params: &SnapshotCreateParams) -> Result<Snapshot, ApiError>;

    async fn update_snapshot(&self, id: i64, params: &SnapshotUpdateParams)
    -> Result<(), ApiError>;

    async fn delete_snapshot(&self, id: i64) -> Result<(), ApiError>;
}
