use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Bearer credential issued by the device-authorization flow, cached per
/// sso-session. The start URL and region pin the cache entry to the session
/// configuration that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceToken {
    pub access_token: String,
    pub expires_at_unix: Option<u64>,
    pub region: String,
    pub start_url: String,
}

impl DeviceToken {
    const EXPIRY_SKEW_SECS: u64 = 30;

    pub fn is_expired(&self, now: SystemTime) -> bool {
        let Some(expires_at) = self.expires_at_unix else {
            return false;
        };

        let Ok(duration) = now.duration_since(UNIX_EPOCH) else {
            return false;
        };

        duration.as_secs().saturating_add(Self::EXPIRY_SKEW_SECS) >= expires_at
    }

    pub fn matches_session(&self, start_url: &str, region: &str) -> bool {
        self.start_url == start_url && self.region == region
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn token(expires_at_unix: Option<u64>) -> DeviceToken {
        DeviceToken {
            access_token: "token".to_string(),
            expires_at_unix,
            region: "us-east-2".to_string(),
            start_url: "https://example.awsapps.com/start".to_string(),
        }
    }

    #[test]
    fn token_without_expiry_never_expires() {
        assert!(!token(None).is_expired(SystemTime::now()));
    }

    #[test]
    fn expiry_applies_clock_skew() {
        let now = SystemTime::now();
        let now_unix = now.duration_since(UNIX_EPOCH).unwrap().as_secs();

        // nominally valid for 10 more seconds, but inside the skew window
        assert!(token(Some(now_unix + 10)).is_expired(now));
        assert!(!token(Some(now_unix + 300)).is_expired(now));
    }

    #[test]
    fn expired_token_stays_expired() {
        let now = SystemTime::now();
        let past = now - Duration::from_secs(3600);
        let past_unix = past.duration_since(UNIX_EPOCH).unwrap().as_secs();
        assert!(token(Some(past_unix)).is_expired(now));
    }

    #[test]
    fn session_match_requires_url_and_region() {
        let token = token(None);
        assert!(token.matches_session("https://example.awsapps.com/start", "us-east-2"));
        assert!(!token.matches_session("https://other.awsapps.com/start", "us-east-2"));
        assert!(!token.matches_session("https://example.awsapps.com/start", "us-east-1"));
    }
}
