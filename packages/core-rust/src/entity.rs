//! Typed entity records stored in the backend.
//!
//! Wire names are camelCase to match the GraphQL schema. Scalar dates and
//! datetimes stay ISO-8601 strings: this layer does no input validation, and
//! the backend assigns `createdAt`/`updatedAt` itself — clients never set
//! timestamps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Sample record: one identifier, two foreign-key references, and a spread
/// of scalar fields of every supported type.
///
/// `id` is immutable and unique. Every non-key field is optional on the wire;
/// a freshly created record may carry only the attributes the caller chose to
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Unique, immutable identifier.
    pub id: String,
    /// Reference to the owning group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Reference to the owning user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_int: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_float: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_bool: Option<bool>,
    /// ISO-8601 date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_date: Option<String>,
    /// ISO-8601 datetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_date_time: Option<String>,
    /// Arbitrary structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_json: Option<Value>,
    /// Expiry marker, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Backend-assigned creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Backend-assigned update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Sample {
    /// The lookup key for this record.
    #[must_use]
    pub fn key(&self) -> SampleKey {
        SampleKey {
            id: self.id.clone(),
        }
    }
}

/// Lookup key for a [`Sample`]: the partial-attribute tuple used by batch
/// reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleKey {
    pub id: String,
}

impl SampleKey {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// The profile slice of a User record, as consumed by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name.
    pub nick_name: String,
    /// Birth month, ISO format (`YYYY-MM`).
    pub birth_ym: String,
    /// `male` or `female`.
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_key: Option<String>,
}
