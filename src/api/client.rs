use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time;
use url::Url;

use crate::error::{AppError, AppResult};

use super::models::{
    AccountView, DeviceAuthorization, IssuedToken, RegisteredClient, RoleView, TokenPoll,
};
use super::{oidc, portal};

const BEARER_HEADER: &str = "x-amz-sso_bearer_token";
const MAX_LIST_ATTEMPTS: u32 = 5;
const RETRY_BASE_DELAY_MS: u64 = 200;

/// Unsigned HTTP client for the IAM Identity Center OIDC and account-portal
/// endpoints of one region. Portal listings run under an adaptive retry
/// budget; OIDC calls do not retry.
#[derive(Debug, Clone)]
pub struct SsoClient {
    http: Client,
    oidc_base_url: String,
    portal_base_url: String,
}

impl SsoClient {
    pub fn for_region(region: &str) -> Self {
        Self::with_base_urls(
            format!("https://oidc.{region}.amazonaws.com"),
            format!("https://portal.sso.{region}.amazonaws.com"),
        )
    }

    pub fn with_base_urls(oidc_base_url: String, portal_base_url: String) -> Self {
        Self {
            http: Client::new(),
            oidc_base_url,
            portal_base_url,
        }
    }

    pub async fn register_client(
        &self,
        client_name: &str,
        scopes: &[&str],
    ) -> AppResult<RegisteredClient> {
        let request = RegisterClientRequest {
            client_name,
            client_type: oidc::CLIENT_TYPE,
            scopes,
        };
        let response: RegisterClientResponse = self
            .oidc_post(oidc::register_client_endpoint(), &request)
            .await?;

        Ok(RegisteredClient {
            client_id: response.client_id,
            client_secret: response.client_secret,
        })
    }

    pub async fn start_device_authorization(
        &self,
        client: &RegisteredClient,
        start_url: &str,
    ) -> AppResult<DeviceAuthorization> {
        let request = DeviceAuthorizationRequest {
            client_id: &client.client_id,
            client_secret: &client.client_secret,
            start_url,
        };
        let response: DeviceAuthorizationResponse = self
            .oidc_post(oidc::device_authorization_endpoint(), &request)
            .await?;

        Ok(DeviceAuthorization {
            device_code: response.device_code,
            user_code: response.user_code,
            verification_uri: response.verification_uri,
            verification_uri_complete: response.verification_uri_complete,
            expires_in_secs: response.expires_in,
            interval_secs: response.interval,
        })
    }

    /// One poll of the device-grant token endpoint. Pending and slow-down
    /// answers are part of the protocol, not errors; denial and expiry are.
    pub async fn create_device_token(
        &self,
        client: &RegisteredClient,
        device_code: &str,
    ) -> AppResult<TokenPoll> {
        let request = CreateTokenRequest {
            client_id: &client.client_id,
            client_secret: &client.client_secret,
            grant_type: oidc::DEVICE_GRANT_TYPE,
            device_code,
        };

        let url = endpoint_url(&self.oidc_base_url, oidc::token_endpoint())?;
        let response = self.http.post(url).json(&request).send().await?;

        if response.status().is_success() {
            let payload: CreateTokenResponse = response.json().await?;
            return Ok(TokenPoll::Issued(IssuedToken {
                access_token: payload.access_token,
                expires_in_secs: payload.expires_in,
            }));
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match oidc_error_code(&body).as_deref() {
            Some("authorization_pending") => Ok(TokenPoll::Pending),
            Some("slow_down") => Ok(TokenPoll::SlowDown),
            Some("expired_token") => Err(AppError::Auth(
                "device authorization expired before it was approved".to_string(),
            )),
            Some("access_denied") => Err(AppError::Auth(
                "authorization request was denied".to_string(),
            )),
            _ => Err(map_oidc_error(status, &body)),
        }
    }

    /// Every account the bearer token can see, draining pagination in
    /// server order.
    pub async fn list_accounts(&self, bearer_token: &str) -> AppResult<Vec<AccountView>> {
        let mut accounts = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let query = portal::list_accounts_query(next_token.as_deref());
            let page: AccountListResource = self
                .portal_get(portal::list_accounts_endpoint(), bearer_token, &query)
                .await?;

            accounts.extend(
                page.account_list
                    .unwrap_or_default()
                    .into_iter()
                    .map(AccountResource::into_view),
            );

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(accounts)
    }

    pub async fn list_account_roles(
        &self,
        bearer_token: &str,
        account_id: &str,
    ) -> AppResult<Vec<RoleView>> {
        let mut roles = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let query = portal::list_roles_query(account_id, next_token.as_deref());
            let page: RoleListResource = self
                .portal_get(portal::list_roles_endpoint(), bearer_token, &query)
                .await?;

            roles.extend(
                page.role_list
                    .unwrap_or_default()
                    .into_iter()
                    .map(|role| role.into_view(account_id)),
            );

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(roles)
    }

    async fn oidc_post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = endpoint_url(&self.oidc_base_url, endpoint)?;
        let response = self.http.post(url).json(body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_oidc_error(status, &body))
    }

    async fn portal_get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        bearer_token: &str,
        query: &[(String, String)],
    ) -> AppResult<T> {
        let url = endpoint_url(&self.portal_base_url, endpoint)?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = self
                .http
                .get(url.clone())
                .header(BEARER_HEADER, bearer_token)
                .query(query);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json().await?);
                    }

                    if attempt < MAX_LIST_ATTEMPTS && is_retryable_status(status) {
                        time::sleep(retry_delay(attempt)).await;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(map_portal_error(status, &body));
                }
                Err(err)
                    if attempt < MAX_LIST_ATTEMPTS && (err.is_connect() || err.is_timeout()) =>
                {
                    time::sleep(retry_delay(attempt)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn endpoint_url(base_url: &str, endpoint: &str) -> AppResult<Url> {
    let mut url = Url::parse(base_url)?;
    url.set_path(endpoint.trim_start_matches('/'));
    Ok(url)
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BASE_DELAY_MS << (attempt - 1).min(4))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterClientRequest<'a> {
    client_name: &'a str,
    client_type: &'a str,
    scopes: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterClientResponse {
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceAuthorizationRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    start_url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceAuthorizationResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    verification_uri_complete: Option<String>,
    expires_in: u64,
    interval: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    device_code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OidcErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountListResource {
    account_list: Option<Vec<AccountResource>>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResource {
    account_id: String,
    account_name: String,
    email_address: Option<String>,
}

impl AccountResource {
    fn into_view(self) -> AccountView {
        AccountView {
            account_id: self.account_id,
            account_name: self.account_name,
            email_address: self.email_address,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleListResource {
    role_list: Option<Vec<RoleResource>>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleResource {
    role_name: String,
    account_id: Option<String>,
}

impl RoleResource {
    fn into_view(self, requested_account_id: &str) -> RoleView {
        RoleView {
            account_id: self
                .account_id
                .unwrap_or_else(|| requested_account_id.to_string()),
            role_name: self.role_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PortalErrorResponse {
    message: Option<String>,
}

fn oidc_error_code(body: &str) -> Option<String> {
    serde_json::from_str::<OidcErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.error)
}

fn map_oidc_error(status: StatusCode, body: &str) -> AppError {
    if let Ok(payload) = serde_json::from_str::<OidcErrorResponse>(body) {
        let error = payload.error.unwrap_or_else(|| "unknown_error".to_string());
        let description = payload
            .error_description
            .unwrap_or_else(|| "no description".to_string());
        return AppError::Auth(format!(
            "sso-oidc request failed ({status}): {error} ({description})"
        ));
    }

    let body = body.trim();
    if body.is_empty() {
        AppError::Auth(format!("sso-oidc request failed ({status})"))
    } else {
        AppError::Auth(format!("sso-oidc request failed ({status}): {body}"))
    }
}

fn map_portal_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<PortalErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.message)
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                "no error details in response body".to_string()
            } else {
                body.to_string()
            }
        });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return AppError::Auth(format!(
            "sso portal authorization failed ({status}): {message}"
        ));
    }

    AppError::Api(format!("sso portal request failed ({status}): {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_account_resource_to_view() {
        let resource = AccountResource {
            account_id: "1234567890".to_string(),
            account_name: "My Team.".to_string(),
            email_address: Some("team@example.com".to_string()),
        };

        let view = resource.into_view();
        assert_eq!(view.account_id, "1234567890");
        assert_eq!(view.account_name, "My Team.");
        assert_eq!(view.email_address.as_deref(), Some("team@example.com"));
    }

    #[test]
    fn role_view_falls_back_to_requested_account() {
        let resource = RoleResource {
            role_name: "Admin".to_string(),
            account_id: None,
        };

        let view = resource.into_view("1234567890");
        assert_eq!(view.account_id, "1234567890");
        assert_eq!(view.role_name, "Admin");
    }

    #[test]
    fn recognizes_pending_authorization() {
        assert_eq!(
            oidc_error_code(r#"{"error":"authorization_pending"}"#).as_deref(),
            Some("authorization_pending")
        );
        assert_eq!(oidc_error_code("not json"), None);
    }

    #[test]
    fn maps_unauthorized_portal_response_as_auth_error() {
        let error = map_portal_error(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Session token not found or invalid"}"#,
        );

        match error {
            AppError::Auth(message) => {
                assert!(message.contains("Session token not found"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn maps_server_failure_as_api_error() {
        let error = map_portal_error(StatusCode::INTERNAL_SERVER_ERROR, "");

        match error {
            AppError::Api(message) => {
                assert!(message.contains("500"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn retries_cover_throttling_and_server_errors() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn retry_delay_grows_per_attempt() {
        assert!(retry_delay(1) < retry_delay(2));
        assert!(retry_delay(2) < retry_delay(4));
    }
}
