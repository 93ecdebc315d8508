//! Session token storage using system keyring

use keyring::Entry;

use super::error::ApiError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "aula";
/// Entry name for the session token
const TOKEN_ENTRY: &str = "iaev-api-token";

/// Manages the platform session token in the system keyring
pub struct TokenStore;

impl TokenStore {
    /// Get the session token from the system keyring
    pub fn get_token() -> Result<String, ApiError> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_ENTRY)
            .map_err(|e| ApiError::Keyring(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => ApiError::NotLoggedIn,
            _ => ApiError::Keyring(e.to_string()),
        })
    }

    /// Store the session token in the system keyring
    pub fn set_token(token: &str) -> Result<(), ApiError> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_ENTRY)
            .map_err(|e| ApiError::Keyring(e.to_string()))?;

        entry.set_password(token).map_err(|e| ApiError::Keyring(e.to_string()))
    }

    /// Check if a session token is stored
    pub fn has_token() -> bool {
        Self::get_token().is_ok()
    }

    /// Delete the stored session token
    pub fn delete_token() -> Result<(), ApiError> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_ENTRY)
            .map_err(|e| ApiError::Keyring(e.to_string()))?;

        entry.delete_credential().map_err(|e| ApiError::Keyring(e.to_string()))
    }

    /// Mask a token for display (show first and last 4 chars).
    ///
    /// The token is an opaque server string, so the split counts
    /// characters rather than bytes.
    pub fn mask_token(token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len());
        }
        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_token() {
        let token = "eyJhbGciOiJIUzI1NiJ9.session.sig-abcd";
        let masked = TokenStore::mask_token(token);
        assert!(masked.starts_with("eyJh"));
        assert!(masked.ends_with("abcd"));
        assert!(masked.contains("..."));
    }

    #[test]
    fn mask_short_token() {
        assert_eq!(TokenStore::mask_token("tiny"), "****");
    }

    #[test]
    fn mask_multibyte_token() {
        assert_eq!(TokenStore::mask_token("ñandú"), "*****");

        let masked = TokenStore::mask_token("sésame-ouvre-toi-jeton-de-session");
        assert!(masked.starts_with("sésa"));
        assert!(masked.ends_with("sion"));
    }
}
