use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::types::{
    CreateResponse, ErrorEnvelope, NfsExport, NfsExportList, NfsExportParams, NfsExportQuery,
    Snapshot, SnapshotCreateParams, SnapshotList, SnapshotQuery, SnapshotUpdateParams,
};
use super::{ApiError, ArrayApi};
use crate::config::ProviderConfig;
use crate::pagination::Page;

const NFS_EXPORTS_PATH: &str = "/platform/2/protocols/nfs/exports";
const SNAPSHOTS_PATH: &str = "/platform/1/snapshot/snapshots";

#[derive(Clone)]
pub struct ArrayClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl ArrayClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, query: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "sending request");
        let url = format!("{}{}{}", self.base_url, path, query);
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string();
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope
                .errors
                .into_iter()
                .next()
                .map(|item| {
                    tracing::debug!(code = ?item.code, "API error envelope");
                    item.message
                })
                .unwrap_or(fallback),
            Err(_) => fallback,
        };

        tracing::debug!(status = status.as_u16(), resource, "request failed");

        match status.as_u16() {
            401 | 403 => Err(ApiError::Auth { message }),
            404 => Err(ApiError::NotFound {
                resource: resource.to_string(),
            }),
            code => Err(ApiError::Api {
                status: code,
                message,
            }),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, resource).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            message: format!("Failed to parse {}: {}", resource, e),
        })
    }
}

fn query_string(params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

// NOTE: A resume token already encodes the original filters; the API rejects
// it combined with any other option.
fn list_query(resume: Option<String>, filters: &[(&str, Option<String>)]) -> String {
    match resume {
        Some(token) => query_string(&[("resume", Some(token))]),
        None => query_string(filters),
    }
}

fn zone_query(zone: Option<&str>) -> String {
    query_string(&[("zone", zone.map(str::to_string))])
}

#[async_trait]
impl ArrayApi for ArrayClient {
    async fn list_nfs_exports(
        &self,
        query: &NfsExportQuery,
        resume: Option<String>,
    ) -> Result<Page<NfsExport>, ApiError> {
        let qs = list_query(
            resume,
            &[
                ("zone", query.zone.clone()),
                ("path", query.path.clone()),
                ("limit", query.limit.map(|l| l.to_string())),
            ],
        );
        let list: NfsExportList = self
            .fetch(self.request(Method::GET, NFS_EXPORTS_PATH, &qs), "NFS exports")
            .await?;
        Ok(Page::new(list.exports, list.resume))
    }

    async fn get_nfs_export(&self, id: i64, zone: Option<&str>) -> Result<NfsExport, ApiError> {
        let resource = format!("NFS export {}", id);
        let path = format!("{}/{}", NFS_EXPORTS_PATH, id);
        let list: NfsExportList = self
            .fetch(self.request(Method::GET, &path, &zone_query(zone)), &resource)
            .await?;
        list.exports
            .into_iter()
            .next()
            .ok_or(ApiError::NotFound { resource })
    }

    async fn create_nfs_export(
        &self,
        zone: Option<&str>,
        params: &NfsExportParams,
    ) -> Result<i64, ApiError> {
        let request = self
            .request(Method::POST, NFS_EXPORTS_PATH, &zone_query(zone))
            .json(params);
        let created: CreateResponse = self.fetch(request, "NFS export").await?;
        Ok(created.id)
    }

    async fn update_nfs_export(
        &self,
        id: i64,
        zone: Option<&str>,
        params: &NfsExportParams,
    ) -> Result<(), ApiError> {
        let path = format!("{}/{}", NFS_EXPORTS_PATH, id);
        let request = self
            .request(Method::PUT, &path, &zone_query(zone))
            .json(params);
        self.send(request, &format!("NFS export {}", id)).await?;
        Ok(())
    }

    async fn delete_nfs_export(&self, id: i64, zone: Option<&str>) -> Result<(), ApiError> {
        let path = format!("{}/{}", NFS_EXPORTS_PATH, id);
        self.send(
            self.request(Method::DELETE, &path, &zone_query(zone)),
            &format!("NFS export {}", id),
        )
        .await?;
        Ok(())
    }

    async fn list_snapshots(
        &self,
        query: &SnapshotQuery,
        resume: Option<String>,
    ) -> Result<Page<Snapshot>, ApiError> {
        let qs = list_query(resume, &[("limit", query.limit.map(|l| l.to_string()))]);
        let list: SnapshotList = self
            .fetch(self.request(Method::GET, SNAPSHOTS_PATH, &qs), "snapshots")
            .await?;
        Ok(Page::new(list.snapshots, list.resume))
    }

    async fn get_snapshot(&self, id: i64) -> Result<Snapshot, ApiError> {
        let resource = format!("snapshot {}", id);
        let path = format!("{}/{}", SNAPSHOTS_PATH, id);
        let list: SnapshotList = self
            .fetch(self.request(Method::GET, &path, ""), &resource)
            .await?;
        list.snapshots
            .into_iter()
            .next()
            .ok_or(ApiError::NotFound { resource })
    }

    async fn create_snapshot(&self, params: &SnapshotCreateParams) -> Result<Snapshot, ApiError> {
        let request = self.request(Method::POST, SNAPSHOTS_PATH, "").json(params);
        self.fetch(request, "snapshot").await
    }

    async fn update_snapshot(
        &self,
        id: i64,
        params: &SnapshotUpdateParams,
    ) -> Result<(), ApiError> {
        let path = format!("{}/{}", SNAPSHOTS_PATH, id);
        let request = self.request(Method::PUT, &path, "").json(params);
        self.send(request, &format!("snapshot {}", id)).await?;
        Ok(())
    }

    async fn delete_snapshot(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{}/{}", SNAPSHOTS_PATH, id);
        self.send(
            self.request(Method::DELETE, &path, ""),
            &format!("snapshot {}", id),
        )
        .await?;
        Ok(())
    }
}

impl std::fmt::Debug for ArrayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
