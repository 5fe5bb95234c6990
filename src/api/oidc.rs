pub const CLIENT_TYPE: &str = "public";
pub const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

pub fn register_client_endpoint() -> &'static str {
    "/client/register"
}

pub fn device_authorization_endpoint() -> &'static str {
    "/device_authorization"
}

pub fn token_endpoint() -> &'static str {
    "/token"
}
