use secrecy::{ExposeSecret, SecretString};

use crate::models::TokenPayload;

/// Fixed login credentials sent to `/auth/credentials`.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// The access + refresh token pair held by a session.
///
/// Always replaced as a whole; there is no way to update one half.
#[derive(Debug, Clone)]
pub struct TokenPair {
    access_token: SecretString,
    refresh_token: SecretString,
}

impl TokenPair {
    pub fn new(access_token: impl Into<SecretString>, refresh_token: impl Into<SecretString>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &SecretString {
        &self.refresh_token
    }

    /// Whether both halves match `other`. Used to detect a pair that has
    /// been rotated by a concurrent refresh.
    pub fn same_as(&self, other: &Self) -> bool {
        self.access_token.expose_secret() == other.access_token.expose_secret()
            && self.refresh_token.expose_secret() == other.refresh_token.expose_secret()
    }
}

impl From<TokenPayload> for TokenPair {
    fn from(payload: TokenPayload) -> Self {
        Self::new(payload.access_token, payload.refresh_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_tokens() {
        let pair = TokenPair::new("access-abc".to_string(), "refresh-xyz".to_string());
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("access-abc"));
        assert!(!rendered.contains("refresh-xyz"));
    }

    #[test]
    fn same_as_compares_both_halves() {
        let a = TokenPair::new("a".to_string(), "r".to_string());
        let b = TokenPair::new("a".to_string(), "r".to_string());
        let c = TokenPair::new("a".to_string(), "r2".to_string());
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }
}
