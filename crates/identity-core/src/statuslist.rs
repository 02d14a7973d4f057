use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::{Identifier, Timestamp};

/// `revocation` clears on reissue; `suspension` is meant to be reversible by
/// the issuer without a new credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPurpose {
    Revocation,
    Suspension,
}

impl StatusPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPurpose::Revocation => "revocation",
            StatusPurpose::Suspension => "suspension",
        }
    }
}

/// W3C StatusList2021 credential: `credentialSubject.encodedList` holds the
/// gzip+base64-encoded bitstring. `identity-codec` owns bit encode/decode;
/// this struct is the persisted envelope around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusListCredential {
    pub issuer: Identifier,
    pub purpose: StatusPurpose,
    pub created_at: Timestamp,
    /// Last time a bit in this list was flipped.
    pub updated_at: Timestamp,
    /// Size of the bitstring in bits. Grows in fixed increments, never
    /// shrinks.
    pub size_bits: u64,
    /// First index not yet allocated; advanced by `allocate_index`.
    pub next_free_index: u64,
    /// gzip+base64 encoded bitstring (see `identity-codec::bitstring`).
    pub encoded_list: String,
}

impl StatusListCredential {
    pub fn context() -> Vec<&'static str> {
        vec![
            "https://www.w3.org/2018/credentials/v1",
            "https://w3id.org/vc/status-list/2021/v1",
        ]
    }

    pub fn type_tags() -> Vec<&'static str> {
        vec!["VerifiableCredential", "StatusList2021Credential"]
    }

    /// Renders this credential as a StatusList2021 JSON-LD verifiable
    /// credential, the format callers of the status-list API receive.
    pub fn to_json_ld(&self, list_id: &str) -> Value {
        json!({
            "@context": Self::context(),
            "id": list_id,
            "type": Self::type_tags(),
            "issuer": self.issuer.to_string(),
            "issuanceDate": self.created_at,
            "credentialSubject": {
                "id": format!("{list_id}#list"),
                "type": "StatusList2021",
                "statusPurpose": self.purpose.as_str(),
                "encodedList": self.encoded_list,
            },
        })
    }
}

/// A single status-list reference, as embedded in a credential: which list,
/// which bit, and (for `check_status`'s response) the decoded outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusListEntry {
    pub list_id: String,
    pub purpose: StatusPurpose,
    pub index: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheckResult {
    pub valid: bool,
    pub bit: bool,
    pub purpose: StatusPurpose,
    pub index: u64,
    pub list_id: String,
    pub last_updated: Timestamp,
}
