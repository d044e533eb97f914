use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scalesync::api::{
    NfsExport, NfsExportParams, NfsExportQuery, Snapshot, SnapshotCreateParams, SnapshotQuery,
    SnapshotUpdateParams,
};
use scalesync::resources::{NfsExportFilter, NfsExportState, SnapshotFilter, SnapshotState};
use scalesync::{ApiError, ArrayApi, DataSource, ManagedResource, Nullable, Page, ScaleProvider, Value};

#[derive(Default)]
struct Inner {
    next_id: i64,
    exports: BTreeMap<i64, NfsExport>,
    snapshots: BTreeMap<i64, Snapshot>,
    list_calls: usize,
}

/// In-memory array that pages list results `page_size` at a time.
struct FakeArray {
    inner: Mutex<Inner>,
    page_size: usize,
    fail_on_page: Option<usize>,
    omit_zone: bool,
}

impl FakeArray {
    fn new(page_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            page_size,
            fail_on_page: None,
            omit_zone: false,
        }
    }

    /// Answers single-export GETs without the `zone` field.
    fn omitting_zone(page_size: usize) -> Self {
        Self {
            omit_zone: true,
            ..Self::new(page_size)
        }
    }

    fn failing_on_page(page_size: usize, page: usize) -> Self {
        Self {
            fail_on_page: Some(page),
            ..Self::new(page_size)
        }
    }

    fn list_calls(&self) -> usize {
        self.inner.lock().unwrap().list_calls
    }

    fn page<T: Clone>(&self, items: Vec<T>, resume: Option<String>) -> Result<Page<T>, ApiError> {
        let start: usize = resume.as_deref().map_or(0, |t| t.parse().unwrap());
        if self.fail_on_page == Some(start / self.page_size) {
            return Err(ApiError::Api {
                status: 500,
                message: "listing interrupted".to_string(),
            });
        }
        let end = (start + self.page_size).min(items.len());
        let next = (end < items.len()).then(|| end.to_string());
        Ok(Page::new(items[start..end].to_vec(), next))
    }

    fn seed_export(&self, zone: &str, path: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.exports.insert(
            id,
            NfsExport {
                id,
                zone: Some(zone.to_string()),
                paths: vec![path.to_string()],
                ..NfsExport::default()
            },
        );
        id
    }

    fn seed_snapshot(&self, name: &str, path: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.snapshots.insert(
            id,
            Snapshot {
                id,
                name: name.to_string(),
                path: path.to_string(),
                created: 1700000000 + id,
                ..Snapshot::default()
            },
        );
        id
    }
}

fn not_found(kind: &str, id: i64) -> ApiError {
    ApiError::NotFound {
        resource: format!("{} {}", kind, id),
    }
}

#[async_trait]
impl ArrayApi for FakeArray {
    async fn list_nfs_exports(
        &self,
        query: &NfsExportQuery,
        resume: Option<String>,
    ) -> Result<Page<NfsExport>, ApiError> {
        let items: Vec<NfsExport> = {
            let mut inner = self.inner.lock().unwrap();
            inner.list_calls += 1;
            inner
                .exports
                .values()
                .filter(|e| query.zone.is_none() || e.zone == query.zone)
                .filter(|e| query.path.as_ref().is_none_or(|p| e.paths.contains(p)))
                .cloned()
                .collect()
        };
        self.page(items, resume)
    }

    async fn get_nfs_export(&self, id: i64, zone: Option<&str>) -> Result<NfsExport, ApiError> {
        let inner = self.inner.lock().unwrap();
        inner
            .exports
            .get(&id)
            .filter(|e| zone.is_none_or(|z| e.zone.as_deref() == Some(z)))
            .map(|e| NfsExport {
                zone: if self.omit_zone { None } else { e.zone.clone() },
                ..e.clone()
            })
            .ok_or_else(|| not_found("NFS export", id))
    }

    async fn create_nfs_export(
        &self,
        zone: Option<&str>,
        params: &NfsExportParams,
    ) -> Result<i64, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        let mut export = NfsExport {
            id,
            zone: Some(zone.unwrap_or("System").to_string()),
            ..NfsExport::default()
        };
        apply_export_params(&mut export, params);
        inner.exports.insert(id, export);
        Ok(id)
    }

    async fn update_nfs_export(
        &self,
        id: i64,
        _zone: Option<&str>,
        params: &NfsExportParams,
    ) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let export = inner
            .exports
            .get_mut(&id)
            .ok_or_else(|| not_found("NFS export", id))?;
        apply_export_params(export, params);
        Ok(())
    }

    async fn delete_nfs_export(&self, id: i64, _zone: Option<&str>) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .exports
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("NFS export", id))
    }

    async fn list_snapshots(
        &self,
        _query: &SnapshotQuery,
        resume: Option<String>,
    ) -> Result<Page<Snapshot>, ApiError> {
        let items: Vec<Snapshot> = {
            let mut inner = self.inner.lock().unwrap();
            inner.list_calls += 1;
            inner.snapshots.values().cloned().collect()
        };
        self.page(items, resume)
    }

    async fn get_snapshot(&self, id: i64) -> Result<Snapshot, ApiError> {
        let inner = self.inner.lock().unwrap();
        inner
            .snapshots
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("snapshot", id))
    }

    async fn create_snapshot(&self, params: &SnapshotCreateParams) -> Result<Snapshot, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        let snapshot = Snapshot {
            id,
            name: params.name.clone().unwrap_or_else(|| format!("s{}", id)),
            path: params.path.clone(),
            alias: params.alias.clone(),
            expires: params.expires,
            created: 1700000000,
            size: Some(0),
            state: Some("active".to_string()),
        };
        inner.snapshots.insert(id, snapshot.clone());
        Ok(snapshot)
    }

    async fn update_snapshot(
        &self,
        id: i64,
        params: &SnapshotUpdateParams,
    ) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let snapshot = inner
            .snapshots
            .get_mut(&id)
            .ok_or_else(|| not_found("snapshot", id))?;
        if let Some(name) = &params.name {
            snapshot.name = name.clone();
        }
        if let Some(alias) = &params.alias {
            snapshot.alias = Some(alias.clone());
        }
        match &params.expires {
            Nullable::Absent => {}
            Nullable::Null => snapshot.expires = None,
            Nullable::Present(expires) => snapshot.expires = Some(*expires),
        }
        Ok(())
    }

    async fn delete_snapshot(&self, id: i64) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .snapshots
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("snapshot", id))
    }
}

fn apply_export_params(export: &mut NfsExport, params: &NfsExportParams) {
    if let Some(paths) = &params.paths {
        export.paths = paths.clone();
    }
    match &params.description {
        Nullable::Absent => {}
        Nullable::Null => export.description = None,
        Nullable::Present(description) => export.description = Some(description.clone()),
    }
    if let Some(clients) = &params.clients {
        export.clients = Some(clients.clone());
    }
    if let Some(read_only) = params.read_only {
        export.read_only = Some(read_only);
    }
    if let Some(flavors) = &params.security_flavors {
        export.security_flavors = Some(flavors.clone());
    }
}

fn setup(page_size: usize) -> (Arc<FakeArray>, ScaleProvider) {
    let array = Arc::new(FakeArray::new(page_size));
    let provider = ScaleProvider::with_api(array.clone());
    (array, provider)
}

fn export_plan(path: &str) -> NfsExportState {
    NfsExportState {
        id: Value::Unknown,
        zone: Value::Unknown,
        paths: Value::Known(vec![path.to_string()]),
        description: "shared projects".into(),
        read_only: Value::Known(true),
        security_flavors: Value::Known(vec!["unix".to_string(), "krb5".to_string()]),
        ..NfsExportState::default()
    }
}

#[tokio::test]
async fn test_nfs_export_lifecycle() {
    let (_array, provider) = setup(10);
    let resource = provider.nfs_export_resource();

    let created = resource.create(&export_plan("/ifs/data/projects")).await.unwrap();
    assert_eq!(created.id, Value::Known("1".to_string()));
    assert_eq!(created.zone, Value::Known("System".to_string()));
    assert_eq!(created.description, Value::Known("shared projects".to_string()));
    assert_eq!(created.clients, Value::Null);

    let read = resource.read(&created).await.unwrap();
    assert_eq!(read.as_ref(), Some(&created));

    let plan = NfsExportState {
        description: Value::Null,
        read_only: Value::Known(false),
        ..created.clone()
    };
    let updated = resource.update(&created, &plan).await.unwrap();
    assert_eq!(updated.description, Value::Null);
    assert_eq!(updated.read_only, Value::Known(false));
    assert_eq!(updated.paths, created.paths);

    resource.delete(&updated).await.unwrap();
    assert_eq!(resource.read(&updated).await.unwrap(), None);

    // Deleting twice is not an error.
    resource.delete(&updated).await.unwrap();
}

#[tokio::test]
async fn test_nfs_export_create_in_zone() {
    let (_array, provider) = setup(10);
    let resource = provider.nfs_export_resource();

    let plan = NfsExportState {
        zone: "tenant".into(),
        ..export_plan("/ifs/tenant/home")
    };
    let created = resource.create(&plan).await.unwrap();
    assert_eq!(created.zone, Value::Known("tenant".to_string()));
}

#[tokio::test]
async fn test_nfs_export_create_requires_paths() {
    let (array, provider) = setup(10);
    let resource = provider.nfs_export_resource();

    let plan = NfsExportState {
        paths: Value::Known(Vec::new()),
        ..export_plan("/unused")
    };
    let diag = resource.create(&plan).await.unwrap_err();
    assert_eq!(diag.attribute.as_deref(), Some("paths"));
    assert!(array.inner.lock().unwrap().exports.is_empty());
}

#[tokio::test]
async fn test_nfs_export_update_rejects_empty_paths() {
    let (array, provider) = setup(10);
    let resource = provider.nfs_export_resource();

    let created = resource.create(&export_plan("/ifs/data")).await.unwrap();
    let plan = NfsExportState {
        paths: Value::Known(Vec::new()),
        ..created.clone()
    };
    let diag = resource.update(&created, &plan).await.unwrap_err();

    assert_eq!(diag.summary, "Error updating NFS export");
    assert_eq!(diag.attribute.as_deref(), Some("paths"));
    let stored = array.get_nfs_export(1, None).await.unwrap();
    assert_eq!(stored.paths, vec!["/ifs/data"]);
}

#[tokio::test]
async fn test_nfs_export_update_leaves_unknown_paths_alone() {
    let (_array, provider) = setup(10);
    let resource = provider.nfs_export_resource();

    let created = resource.create(&export_plan("/ifs/data")).await.unwrap();
    let plan = NfsExportState {
        paths: Value::Unknown,
        read_only: Value::Known(false),
        ..created.clone()
    };
    let updated = resource.update(&created, &plan).await.unwrap();
    assert_eq!(updated.paths, Value::Known(vec!["/ifs/data".to_string()]));
}

#[tokio::test]
async fn test_nfs_export_rejects_invalid_security_flavor() {
    let (array, provider) = setup(10);
    let resource = provider.nfs_export_resource();

    let plan = NfsExportState {
        security_flavors: Value::Known(vec!["unix".to_string(), "kerberos".to_string()]),
        ..export_plan("/ifs/data")
    };
    let diag = resource.create(&plan).await.unwrap_err();
    assert_eq!(diag.attribute.as_deref(), Some("security_flavors[1]"));
    assert!(diag.detail.contains("kerberos"));
    assert!(array.inner.lock().unwrap().exports.is_empty());
}

#[tokio::test]
async fn test_nfs_export_zone_is_immutable() {
    let (array, provider) = setup(10);
    let resource = provider.nfs_export_resource();

    let created = resource.create(&export_plan("/ifs/data")).await.unwrap();
    let plan = NfsExportState {
        zone: "tenant".into(),
        ..created.clone()
    };
    let diag = resource.update(&created, &plan).await.unwrap_err();

    assert_eq!(diag.summary, "may not change zone");
    assert_eq!(diag.attribute.as_deref(), Some("zone"));
    let stored = array.get_nfs_export(1, None).await.unwrap();
    assert_eq!(stored.zone.as_deref(), Some("System"));
}

#[tokio::test]
async fn test_nfs_export_import() {
    let (array, provider) = setup(10);
    let resource = provider.nfs_export_resource();
    let id = array.seed_export("tenant", "/ifs/tenant/data");

    let by_id = resource.import(&id.to_string()).await.unwrap();
    assert_eq!(by_id.zone, Value::Known("tenant".to_string()));

    let by_zone = resource.import(&format!("tenant:{}", id)).await.unwrap();
    assert_eq!(by_zone, by_id);

    let diag = resource.import(&format!("System:{}", id)).await.unwrap_err();
    assert_eq!(diag.summary, "Error importing NFS export");

    let diag = resource.import("tenant:abc").await.unwrap_err();
    assert_eq!(diag.attribute.as_deref(), Some("id"));
}

#[tokio::test]
async fn test_nfs_export_keeps_zone_when_response_omits_it() {
    let array = Arc::new(FakeArray::omitting_zone(10));
    let id = array.seed_export("tenant", "/ifs/tenant/data");
    let provider = ScaleProvider::with_api(array.clone());
    let resource = provider.nfs_export_resource();

    let imported = resource.import(&format!("tenant:{}", id)).await.unwrap();
    assert_eq!(imported.zone, Value::Known("tenant".to_string()));

    let refreshed = resource.read(&imported).await.unwrap();
    assert_eq!(refreshed, Some(imported));

    let plan = NfsExportState {
        zone: "tenant".into(),
        ..export_plan("/ifs/tenant/home")
    };
    let created = resource.create(&plan).await.unwrap();
    assert_eq!(created.zone, Value::Known("tenant".to_string()));
    assert!(resource.read(&created).await.unwrap().is_some());
}

#[tokio::test]
async fn test_nfs_export_defaults_zone_when_none_given() {
    let array = Arc::new(FakeArray::omitting_zone(10));
    let id = array.seed_export("System", "/ifs/data");
    let provider = ScaleProvider::with_api(array.clone());

    let imported = provider
        .nfs_export_resource()
        .import(&id.to_string())
        .await
        .unwrap();
    assert_eq!(imported.zone, Value::Known("System".to_string()));
}

#[tokio::test]
async fn test_nfs_export_data_source_collects_every_page() {
    let (array, provider) = setup(2);
    for i in 0..5 {
        array.seed_export("System", &format!("/ifs/data/{}", i));
    }
    array.seed_export("tenant", "/ifs/tenant/data");

    let data_source = provider.nfs_export_data_source();
    let filter = NfsExportFilter {
        zone: Some("System".to_string()),
        path: None,
    };
    let states = data_source.read(&filter).await.unwrap();

    let ids: Vec<String> = states
        .iter()
        .filter_map(|s| s.id.as_known().cloned())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(array.list_calls(), 3);
}

#[tokio::test]
async fn test_nfs_export_data_source_fails_closed() {
    let array = Arc::new(FakeArray::failing_on_page(2, 1));
    for i in 0..5 {
        array.seed_export("System", &format!("/ifs/data/{}", i));
    }
    let provider = ScaleProvider::with_api(array.clone());

    let diag = provider
        .nfs_export_data_source()
        .read(&NfsExportFilter::default())
        .await
        .unwrap_err();

    assert_eq!(diag.summary, "Error reading NFS exports");
    assert!(diag.detail.contains("listing interrupted"));
}

#[tokio::test]
async fn test_snapshot_lifecycle_clears_expiry() {
    let (_array, provider) = setup(10);
    let resource = provider.snapshot_resource();

    let plan = SnapshotState {
        name: "before-upgrade".into(),
        path: "/ifs/data".into(),
        expires: Value::Known(1800000000),
        ..SnapshotState::default()
    };
    let created = resource.create(&plan).await.unwrap();
    assert_eq!(created.name, Value::Known("before-upgrade".to_string()));
    assert_eq!(created.expires, Value::Known(1800000000));
    assert_eq!(created.alias, Value::Null);
    assert!(created.created.is_known());

    let plan = SnapshotState {
        expires: Value::Null,
        ..created.clone()
    };
    let updated = resource.update(&created, &plan).await.unwrap();
    assert_eq!(updated.expires, Value::Null);
    assert_eq!(updated.name, created.name);

    resource.delete(&updated).await.unwrap();
    assert_eq!(resource.read(&updated).await.unwrap(), None);
}

#[tokio::test]
async fn test_snapshot_update_keeps_expiry_when_unknown() {
    let (_array, provider) = setup(10);
    let resource = provider.snapshot_resource();

    let created = resource
        .create(&SnapshotState {
            path: "/ifs/data".into(),
            expires: Value::Known(1800000000),
            ..SnapshotState::default()
        })
        .await
        .unwrap();

    let plan = SnapshotState {
        alias: "latest".into(),
        expires: Value::Unknown,
        ..created.clone()
    };
    let updated = resource.update(&created, &plan).await.unwrap();
    assert_eq!(updated.alias, Value::Known("latest".to_string()));
    assert_eq!(updated.expires, Value::Known(1800000000));
}

#[tokio::test]
async fn test_snapshot_path_is_immutable() {
    let (_array, provider) = setup(10);
    let resource = provider.snapshot_resource();

    let created = resource
        .create(&SnapshotState {
            path: "/ifs/data".into(),
            ..SnapshotState::default()
        })
        .await
        .unwrap();
    let plan = SnapshotState {
        path: "/ifs/other".into(),
        ..created.clone()
    };

    let diag = resource.update(&created, &plan).await.unwrap_err();
    assert_eq!(diag.attribute.as_deref(), Some("path"));
}

#[tokio::test]
async fn test_snapshot_create_requires_path() {
    let (_array, provider) = setup(10);
    let resource = provider.snapshot_resource();

    let diag = resource
        .create(&SnapshotState {
            name: "orphan".into(),
            path: Value::Null,
            ..SnapshotState::default()
        })
        .await
        .unwrap_err();
    assert_eq!(diag.summary, "Error creating snapshot");
    assert_eq!(diag.attribute.as_deref(), Some("path"));
}

#[tokio::test]
async fn test_snapshot_import() {
    let (array, provider) = setup(10);
    let id = array.seed_snapshot("nightly", "/ifs/data");

    let state = provider
        .snapshot_resource()
        .import(&id.to_string())
        .await
        .unwrap();
    assert_eq!(state.name, Value::Known("nightly".to_string()));
    assert_eq!(state.expires, Value::Null);

    let diag = provider.snapshot_resource().import("99").await.unwrap_err();
    assert!(diag.detail.contains("snapshot 99 not found"));
}

#[tokio::test]
async fn test_snapshot_data_source_filters_across_pages() {
    let (array, provider) = setup(2);
    array.seed_snapshot("a", "/ifs/data");
    array.seed_snapshot("b", "/ifs/home");
    array.seed_snapshot("c", "/ifs/data");
    array.seed_snapshot("d", "/ifs/data");
    array.seed_snapshot("e", "/ifs/home");

    let data_source = provider.snapshot_data_source();
    let filter = SnapshotFilter {
        path: Some("/ifs/data".to_string()),
        name: None,
    };
    let names: Vec<String> = data_source
        .read(&filter)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|s| s.name.into_known())
        .collect();
    assert_eq!(names, vec!["a", "c", "d"]);

    let filter = SnapshotFilter {
        path: Some("/ifs/home".to_string()),
        name: Some("e".to_string()),
    };
    assert_eq!(data_source.read(&filter).await.unwrap().len(), 1);
}
