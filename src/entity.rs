//! Entities supplied by the host for lookup.

use cse_search::SearchTerm;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognised indicator or free-text search string.
///
/// Fields the host sends beyond `value` and `type` are kept in `extra` and
/// echoed back unchanged in the lookup result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub value: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Entity {
    #[must_use]
    pub fn new(value: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            value: value.into(),
            entity_type,
            extra: serde_json::Map::new(),
        }
    }
}

impl SearchTerm for Entity {
    fn search_term(&self) -> &str {
        &self.value
    }
}

/// Entity type as named by the host.
///
/// Unrecognised names are preserved verbatim in [`EntityType::Other`] so
/// they round-trip back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    IPv4,
    IPv6,
    IPv4Cidr,
    Md5,
    Sha1,
    Sha256,
    Domain,
    Email,
    Url,
    Cve,
    /// A host custom type, e.g. the free-text `search` type.
    Custom,
    Other(String),
}

impl EntityType {
    /// The host's wire name for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::IPv4 => "IPv4",
            Self::IPv6 => "IPv6",
            Self::IPv4Cidr => "IPv4CIDR",
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Domain => "domain",
            Self::Email => "email",
            Self::Url => "url",
            Self::Cve => "cve",
            Self::Custom => "custom",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for EntityType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "IPv4" => Self::IPv4,
            "IPv6" => Self::IPv6,
            "IPv4CIDR" => Self::IPv4Cidr,
            "MD5" => Self::Md5,
            "SHA1" => Self::Sha1,
            "SHA256" => Self::Sha256,
            "domain" => Self::Domain,
            "email" => Self::Email,
            "url" => Self::Url,
            "cve" => Self::Cve,
            "custom" => Self::Custom,
            _ => Self::Other(raw),
        }
    }
}

impl From<EntityType> for String {
    fn from(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
