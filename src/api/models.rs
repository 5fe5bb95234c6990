use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub account_id: String,
    pub account_name: String,
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleView {
    pub account_id: String,
    pub role_name: String,
}

/// OIDC client registration used for the device-authorization grant.
#[derive(Debug, Clone)]
pub struct RegisteredClient {
    pub client_id: String,
    pub client_secret: String,
}

/// Server-issued device authorization: what to show the operator and what
/// to poll with.
#[derive(Debug, Clone)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub expires_in_secs: u64,
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in_secs: Option<u64>,
}

/// One round of the device-grant token poll.
#[derive(Debug, Clone)]
pub enum TokenPoll {
    Issued(IssuedToken),
    Pending,
    SlowDown,
}
