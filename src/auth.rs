use anyhow::{Result, anyhow};
use reqwest::header::HeaderValue;
use std::fmt;
use std::str::FromStr;

/// Header the Postman API reads the key from.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, PartialEq)]
pub struct ApiKey(String);

impl FromStr for ApiKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if key.is_empty() {
            return Err(anyhow!("API key cannot be empty"));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(anyhow!("API key cannot contain whitespace"));
        }
        Ok(ApiKey(key.to_string()))
    }
}

impl ApiKey {
    /// Keys issued by Postman start with `PMAK-`.
    pub fn is_postman_key(&self) -> bool {
        self.0.starts_with("PMAK-")
    }

    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() > 12 {
            let head: String = chars[..5].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        } else {
            "*".repeat(chars.len())
        }
    }

    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.0)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
