//! scalesync - state/DTO synchronization for a scale-out NAS Terraform provider.
//!
//! Maps tri-state configuration values onto the array's REST API records and
//! back, pages through list endpoints, and wraps both in resource handlers.

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod pagination;
pub mod provider;
pub mod resources;
pub mod sync;

mod error;

pub use api::{ApiError, ArrayApi, ArrayClient};
pub use config::ProviderConfig;
pub use diagnostics::{Diagnostic, ensure_unchanged};
pub use error::ScaleSyncError;
pub use pagination::{Page, collect_pages};
pub use provider::ScaleProvider;
pub use resources::{DataSource, ManagedResource};
pub use sync::{Nullable, Value, copy_to_dto, copy_to_state};
