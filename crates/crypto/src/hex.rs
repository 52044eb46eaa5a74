use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

/// Strips a single leading `0x`, if present.
pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Hex-encoded secret as read from the environment.
///
/// Parsing never fails: validation happens when the secret is turned into a
/// [`crate::SigningKey`], so a malformed value surfaces as a typed error
/// instead of a config-loading failure that might echo it.
pub struct SecretHex(SecretString);

impl SecretHex {
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl FromStr for SecretHex {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(SecretString::from(s.trim().to_owned())))
    }
}

impl From<&str> for SecretHex {
    fn from(s: &str) -> Self {
        Self(SecretString::from(s.trim().to_owned()))
    }
}

impl fmt::Debug for SecretHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHex([REDACTED])")
    }
}
