//! Logical ids and references between declarations

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use sha2::{Digest, Sha256};

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^A-Za-z0-9]").expect("static regex is valid"));

/// Template-unique identifier of a declared resource
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    /// Derive the logical id of `construct_id` declared in `stack`.
    ///
    /// The readable part keeps only the alphanumerics of the construct id; the
    /// suffix is the first four bytes of the sha256 of `stack/construct_id`,
    /// upper-case hex, so ids are stable across runs.
    pub fn derive(stack: &str, construct_id: &str) -> Self {
        let digest = Sha256::digest(format!("{stack}/{construct_id}").as_bytes());
        let readable = NON_ALPHANUMERIC.replace_all(construct_id, "");
        Self(format!("{readable}{}", hex::encode_upper(&digest[..4])))
    }

    /// The id as it appears in the template
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value resolved by the orchestrator at deploy time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `{"Ref": id}`
    Ref(LogicalId),
    /// `{"Fn::GetAtt": [id, attribute]}`
    GetAtt(LogicalId, String),
}

impl Reference {
    /// The resource this reference points at
    pub fn logical_id(&self) -> &LogicalId {
        match self {
            Self::Ref(id) | Self::GetAtt(id, _) => id,
        }
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Ref(id) => map.serialize_entry("Ref", id)?,
            Self::GetAtt(id, attribute) => {
                map.serialize_entry("Fn::GetAtt", &(id, attribute))?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logical_id_is_deterministic() {
        let a = LogicalId::derive("BillingMonitor", "alarm-AmazonEC2");
        let b = LogicalId::derive("BillingMonitor", "alarm-AmazonEC2");
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("alarmAmazonEC2"));
        assert_eq!(a.as_str().len(), "alarmAmazonEC2".len() + 8);
    }

    #[test]
    fn test_logical_id_depends_on_stack() {
        let a = LogicalId::derive("BillingMonitor", "topic");
        let b = LogicalId::derive("Other", "topic");
        assert_ne!(a, b);
    }

    #[test]
    fn test_logical_id_suffix_is_upper_hex() {
        let id = LogicalId::derive("BillingMonitor", "chatbotRole");
        let suffix = &id.as_str()["chatbotRole".len()..];
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_reference_serialization() {
        let id = LogicalId::derive("S", "role");
        let by_ref = serde_json::to_value(Reference::Ref(id.clone())).unwrap();
        let by_att = serde_json::to_value(Reference::GetAtt(id.clone(), "Arn".into())).unwrap();

        assert_eq!(by_ref, json!({ "Ref": id.as_str() }));
        assert_eq!(by_att, json!({ "Fn::GetAtt": [id.as_str(), "Arn"] }));
    }
}
