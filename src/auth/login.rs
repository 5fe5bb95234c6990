use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::time;

use crate::api::{DeviceAuthorization, IssuedToken, RegisteredClient, SsoClient, TokenPoll};
use crate::config::SsoSession;
use crate::error::{AppError, AppResult};

use super::DeviceToken;
use super::cache::TokenCache;

const CLIENT_NAME: &str = "ssoprof";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const SLOW_DOWN_BACKOFF_SECS: u64 = 5;

#[derive(Debug, Default)]
pub struct AuthService;

impl AuthService {
    /// Obtain a bearer token for the session, reusing a cached token when
    /// it is fresh and still matches the session's start URL and region.
    /// Runs the OIDC device-authorization grant otherwise: register a
    /// public client, start a device authorization, send the operator to
    /// the verification page, then poll until approval.
    pub async fn login<C: TokenCache>(
        client: &SsoClient,
        session: &SsoSession,
        cache: &C,
        no_browser: bool,
    ) -> AppResult<DeviceToken> {
        if let Some(token) = cache.load(&session.name)?
            && !token.is_expired(SystemTime::now())
            && token.matches_session(&session.start_url, &session.region)
        {
            return Ok(token);
        }

        let registration = client
            .register_client(CLIENT_NAME, &session.scope_list())
            .await?;
        let device = client
            .start_device_authorization(&registration, &session.start_url)
            .await?;

        let opened_browser = if no_browser {
            false
        } else {
            open_browser(browser_target(&device))
        };
        announce_verification(&device, opened_browser);

        let issued = poll_for_token(client, &registration, &device).await?;

        let token = DeviceToken {
            access_token: issued.access_token,
            expires_at_unix: expires_at_unix(issued.expires_in_secs),
            region: session.region.clone(),
            start_url: session.start_url.clone(),
        };
        cache.save(&session.name, &token)?;

        Ok(token)
    }
}

async fn poll_for_token(
    client: &SsoClient,
    registration: &RegisteredClient,
    device: &DeviceAuthorization,
) -> AppResult<IssuedToken> {
    let deadline = Instant::now() + Duration::from_secs(device.expires_in_secs);
    let mut wait = Duration::from_secs(
        device
            .interval_secs
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
            .max(1),
    );

    loop {
        time::sleep(wait).await;

        if Instant::now() >= deadline {
            return Err(AppError::Auth(
                "device authorization expired before it was approved".to_string(),
            ));
        }

        match client
            .create_device_token(registration, &device.device_code)
            .await?
        {
            TokenPoll::Issued(token) => return Ok(token),
            TokenPoll::Pending => {}
            TokenPoll::SlowDown => wait += Duration::from_secs(SLOW_DOWN_BACKOFF_SECS),
        }
    }
}

fn browser_target(device: &DeviceAuthorization) -> &str {
    device
        .verification_uri_complete
        .as_deref()
        .unwrap_or(&device.verification_uri)
}

fn announce_verification(device: &DeviceAuthorization, opened_browser: bool) {
    if opened_browser {
        eprintln!("Attempting to automatically open the SSO authorization page in your default browser.");
        eprintln!("If the browser does not open, use the URL below to authorize this request:");
    } else {
        eprintln!("Open the following URL in a browser to authorize this request:");
    }
    eprintln!();
    eprintln!("{}", device.verification_uri);
    eprintln!();
    eprintln!("Then enter the code:");
    eprintln!();
    eprintln!("{}", device.user_code);
    eprintln!();
}

fn expires_at_unix(expires_in: Option<u64>) -> Option<u64> {
    let expires_in = expires_in?;
    let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
    Some(now.saturating_add(expires_in))
}

fn open_browser(url: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        return std::process::Command::new("open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }

    #[cfg(target_os = "linux")]
    {
        return std::process::Command::new("xdg-open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }

    #[cfg(target_os = "windows")]
    {
        return std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .status()
            .is_ok_and(|status| status.success());
    }

    #[allow(unreachable_code)]
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(complete: Option<&str>) -> DeviceAuthorization {
        DeviceAuthorization {
            device_code: "device-code".to_string(),
            user_code: "ABCD-EFGH".to_string(),
            verification_uri: "https://device.sso.us-east-2.amazonaws.com/".to_string(),
            verification_uri_complete: complete.map(ToOwned::to_owned),
            expires_in_secs: 600,
            interval_secs: Some(1),
        }
    }

    #[test]
    fn browser_prefers_complete_verification_uri() {
        let with_complete = device(Some("https://device.sso.us-east-2.amazonaws.com/?user_code=ABCD-EFGH"));
        assert!(browser_target(&with_complete).contains("user_code"));

        let without = device(None);
        assert_eq!(
            browser_target(&without),
            "https://device.sso.us-east-2.amazonaws.com/"
        );
    }

    #[test]
    fn computes_absolute_expiry() {
        let expires_at = expires_at_unix(Some(600)).unwrap();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(expires_at >= now + 599);
        assert_eq!(expires_at_unix(None), None);
    }
}
