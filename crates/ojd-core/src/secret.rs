//! Redacted secret passed to the job
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "**********";

/// Secret string that never shows up in `Debug`, `Display` or serialized output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The actual value. Keep it out of logs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_printed() {
        let secret = Secret::new("a super secret secret");

        assert!(!format!("{secret:?}").contains("super"));
        assert!(!secret.to_string().contains("super"));
        assert!(!serde_json::to_string(&secret).unwrap().contains("super"));
        assert_eq!(secret.expose(), "a super secret secret");
    }
}
