use crate::error::ScaleSyncError;

/// Connection settings for the array's REST API.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    /// e.g. `https://cluster.example.com:8080`
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub insecure: bool,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    pub fn new(endpoint: String, username: String, password: String) -> Self {
        Self {
            endpoint,
            username,
            password,
            insecure: false,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn validate(&self) -> Result<(), ScaleSyncError> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ScaleSyncError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.username.is_empty() {
            return Err(ScaleSyncError::Config("username must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(ScaleSyncError::Config("password must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ScaleSyncError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("insecure", &self.insecure)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
