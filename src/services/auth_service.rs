use crate::config::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;

/// A username/password pair presented by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("username", &self.username).field("password", &"<redacted>").finish()
    }
}

impl Credentials {
    /// Parses the value of an `Authorization` header using the Basic scheme.
    ///
    /// Returns `None` for any other scheme or a malformed payload.
    #[must_use]
    pub fn from_basic_header(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self { username: username.to_string(), password: password.to_string() })
    }
}

/// Guards the moderation endpoints with a single static credential pair.
#[derive(Clone, Debug)]
pub struct AuthService {
    expected: Credentials,
}

impl AuthService {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self { expected: Credentials { username: config.username.clone(), password: config.password.clone() } }
    }

    /// Returns true iff both parts match the configured pair.
    #[must_use]
    pub fn authorize(&self, credentials: &Credentials) -> bool {
        let username_ok = constant_time_eq(&credentials.username, &self.expected.username);
        let password_ok = constant_time_eq(&credentials.password, &self.expected.password);
        username_ok & password_ok
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    // Slices of different lengths compare unequal without inspecting content.
    bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig { username: "admin".to_string(), password: "back-challenge".to_string() })
    }

    fn header(user_pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(user_pass))
    }

    #[test]
    fn test_parses_basic_header() {
        let creds = Credentials::from_basic_header(&header("admin:back-challenge")).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "back-challenge");
    }

    #[test]
    fn test_password_may_contain_colons() {
        let creds = Credentials::from_basic_header(&header("admin:a:b")).unwrap();
        assert_eq!(creds.password, "a:b");
    }

    #[test]
    fn test_rejects_malformed_headers() {
        assert!(Credentials::from_basic_header("Bearer abc").is_none());
        assert!(Credentials::from_basic_header("Basic !!!not-base64").is_none());
        assert!(Credentials::from_basic_header(&header("no-colon")).is_none());
        assert!(Credentials::from_basic_header("Basic").is_none());
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let value = format!("basic {}", STANDARD.encode("admin:back-challenge"));
        assert!(Credentials::from_basic_header(&value).is_some());
    }

    #[test]
    fn test_authorize_requires_exact_match() {
        let auth = service();
        let check = |user: &str, pass: &str| {
            auth.authorize(&Credentials { username: user.to_string(), password: pass.to_string() })
        };

        assert!(check("admin", "back-challenge"));
        assert!(!check("admin", "back-challeng"));
        assert!(!check("admin", "back-challenge "));
        assert!(!check("Admin", "back-challenge"));
        assert!(!check("", ""));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials { username: "admin".to_string(), password: "back-challenge".to_string() };
        assert!(!format!("{creds:?}").contains("back-challenge"));
    }
}
