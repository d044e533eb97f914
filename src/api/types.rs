use serde::{Deserialize, Serialize};

use crate::sync::Nullable;

pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// Access zone an object belongs to when the API response omits it.
pub const DEFAULT_ZONE: &str = "System";

crate::api_enum! {
    pub enum SecurityFlavor {
        Unix => "unix",
        Krb5 => "krb5",
        Krb5i => "krb5i",
        Krb5p => "krb5p",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfsMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Persona>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_group: Option<Persona>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_groups: Option<Vec<Persona>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NfsExport {
    pub id: i64,
    #[serde(default)]
    pub zone: Option<String>,
    pub paths: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub clients: Option<Vec<String>>,
    #[serde(default)]
    pub root_clients: Option<Vec<String>>,
    #[serde(default)]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub security_flavors: Option<Vec<SecurityFlavor>>,
    #[serde(default)]
    pub map_root: Option<NfsMapping>,
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

/// Body of NFS export create and update requests. The zone travels as a query
/// parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NfsExportParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_clients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_flavors: Option<Vec<SecurityFlavor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_root: Option<NfsMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NfsExportQuery {
    pub zone: Option<String>,
    pub path: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NfsExportList {
    #[serde(default)]
    pub exports: Vec<NfsExport>,
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub expires: Option<i64>,
    pub created: i64,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotCreateParams {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

/// `expires: null` removes the expiry; an omitted field leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    pub expires: Nullable<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotList {
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorItem {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}
