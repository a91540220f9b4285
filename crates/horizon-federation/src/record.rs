//! Federation query results.

use horizon_client::ResponseShape;
use serde::{Deserialize, Deserializer, Serialize};

/// What a federation server knows about one address or account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stellar_address: Option<String>,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,
    /// Servers send id memos as JSON numbers; they are kept as text.
    #[serde(
        default,
        deserialize_with = "deserialize_memo",
        skip_serializing_if = "Option::is_none"
    )]
    pub memo: Option<String>,
}

impl ResponseShape for FederationRecord {}

fn deserialize_memo<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "memo must be a string or a number, got {other}"
        ))),
    }
}
