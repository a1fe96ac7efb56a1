use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{CoreError, CoreResult};

const IDENTITY_HEX_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageIdentity(String);

impl MessageIdentity {
    pub fn of(source_text: &str, context: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source_text.as_bytes());
        hasher.update(context.unwrap_or("").as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn parse(value: &str) -> CoreResult<Self> {
        let value = value.trim();
        let valid = value.len() == IDENTITY_HEX_LEN
            && value.bytes().all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !valid {
            return Err(CoreError::InvalidIdentity(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MessageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for MessageIdentity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MessageIdentity::parse(&value)
    }
}

impl From<MessageIdentity> for String {
    fn from(value: MessageIdentity) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::MessageIdentity;

    #[test]
    fn hashes_deterministically() {
        let a = MessageIdentity::of("Hello", Some("menu"));
        let b = MessageIdentity::of("Hello", Some("menu"));
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn missing_context_matches_empty_context() {
        for source in ["", "Hello", "Line\nbreak", "Ŧest"] {
            assert_eq!(
                MessageIdentity::of(source, None),
                MessageIdentity::of(source, Some(""))
            );
        }
    }

    #[test]
    fn context_disambiguates_identical_sources() {
        assert_ne!(
            MessageIdentity::of("File", Some("menu")),
            MessageIdentity::of("File", Some("toolbar"))
        );
        assert_ne!(
            MessageIdentity::of("File", Some("menu")),
            MessageIdentity::of("File", None)
        );
    }

    #[test]
    fn parses_rendered_identity() {
        let identity = MessageIdentity::of("Hello", None);
        let parsed = MessageIdentity::parse(identity.as_str()).expect("parse");
        assert_eq!(parsed, identity);
    }

    #[test]
    fn rejects_malformed_identity() {
        assert!(MessageIdentity::parse("not-a-hash").is_err());
        assert!(MessageIdentity::parse("d41d8cd98f00b204e9800998ecf8427e").is_err());
        let upper = MessageIdentity::of("Hello", None).as_str().to_uppercase();
        assert!(MessageIdentity::parse(&upper).is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let identity = MessageIdentity::of("Hello", None);
        let json = serde_json::to_string(&identity).expect("json");
        assert_eq!(json, format!("\"{identity}\""));
        let back: MessageIdentity = serde_json::from_str(&json).expect("decode");
        assert_eq!(back, identity);
    }
}
