//! Routing table schema definitions.
//!
//! This module defines the rule table consumed by the matching engine.
//! All types derive Serde traits for deserialization from JSON or TOML files.
//! Field names are camelCase on the wire (`dependsOnKey`, `redirectTarget`).

use serde::{Deserialize, Serialize};

/// Root of the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoutingConfiguration {
    /// Opaque version string, never interpreted by the matcher.
    pub version: String,

    /// Informational metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConfigMetadata>,

    /// Groups in priority order (first match wins).
    pub groups: Vec<RoutingGroup>,
}

impl RoutingConfiguration {
    /// Number of groups in the table.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Descriptive fields attached to a routing table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMetadata {
    /// ISO-8601 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// ISO-8601 timestamp of the last edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A named bucket of routings, selected by the request path segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingGroup {
    /// Matched case-insensitively against the request path.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_value: Option<String>,

    /// Candidate redirects in priority order.
    pub routings: Vec<Routing>,
}

impl RoutingGroup {
    /// Returns the parameter condition gating this group, if both halves are set.
    pub fn condition(&self) -> Option<Condition<'_>> {
        Condition::from_pair(self.depends_on_key.as_deref(), self.depends_on_value.as_deref())
    }
}

/// A single candidate redirect inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Routing {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_value: Option<String>,

    /// Absolute URL the client is sent to.
    pub redirect_target: String,
}

impl Routing {
    /// Returns the parameter condition gating this routing, if both halves are set.
    pub fn condition(&self) -> Option<Condition<'_>> {
        Condition::from_pair(self.depends_on_key.as_deref(), self.depends_on_value.as_deref())
    }
}

/// A `(key, required value)` pair borrowed from a group or routing.
///
/// A half-specified pair (only key or only value) yields no condition at all,
/// so the entry matches unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Condition<'a> {
    fn from_pair(key: Option<&'a str>, value: Option<&'a str>) -> Option<Self> {
        match (key, value) {
            (Some(key), Some(value)) => Some(Self { key, value }),
            _ => None,
        }
    }
}
