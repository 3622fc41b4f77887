//! Configuration validation.
//!
//! # Responsibilities
//! - Structural validation of an untrusted rule table before it is trusted
//! - Check required fields and non-empty sequences
//! - Check redirect targets parse as absolute URLs
//! - Detect group names that collide case-insensitively
//!
//! # Design Decisions
//! - Fails fast: the first violation is returned
//! - Checks run in a fixed order, group by group, duplicates last
//! - Validation is a pure function: `&Value → Result<RoutingConfiguration, ValidationError>`
//! - Runs before a rule table is accepted by the router

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::config::schema::RoutingConfiguration;
use crate::routing::matcher::fold_case;

/// Reason a rule table was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("configuration must be an object with a string 'version'")]
    MissingVersion,

    #[error("'groups' must be an array")]
    GroupsNotArray,

    #[error("'groups' must contain at least one group")]
    NoGroups,

    /// A group or routing without a usable name.
    #[error("{path}.name must be a non-empty string")]
    MissingName { path: String },

    #[error("{path}.routings must be a non-empty array")]
    NoRoutings { path: String },

    #[error("{path}.redirectTarget must be a string")]
    MissingRedirectTarget { path: String },

    #[error("{path}.redirectTarget is not a valid absolute URL: '{target}'")]
    InvalidRedirectTarget { path: String, target: String },

    #[error("duplicate group name '{name}' (names are compared case-insensitively)")]
    DuplicateGroupName { name: String },

    /// Structure passed the checks but an optional field has the wrong type.
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Validate an untrusted value and produce a trusted rule table.
pub fn validate_value(value: &Value) -> Result<RoutingConfiguration, ValidationError> {
    let root = value
        .as_object()
        .filter(|root| root.get("version").is_some_and(Value::is_string))
        .ok_or(ValidationError::MissingVersion)?;

    let groups = root
        .get("groups")
        .and_then(Value::as_array)
        .ok_or(ValidationError::GroupsNotArray)?;

    if groups.is_empty() {
        return Err(ValidationError::NoGroups);
    }

    for (index, group) in groups.iter().enumerate() {
        validate_group(index, group)?;
    }

    check_unique_names(groups.iter().filter_map(|g| g.get("name").and_then(Value::as_str)))?;

    serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Validate an already typed rule table.
///
/// Runs the same checks as [`validate_value`] so both entry points agree.
pub fn validate_config(config: &RoutingConfiguration) -> Result<(), ValidationError> {
    let value =
        serde_json::to_value(config).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    validate_value(&value).map(|_| ())
}

fn validate_group(index: usize, group: &Value) -> Result<(), ValidationError> {
    let path = format!("groups[{index}]");
    let fields = group.as_object();

    if non_empty_str(fields, "name").is_none() {
        return Err(ValidationError::MissingName { path });
    }

    let routings = fields
        .and_then(|f| f.get("routings"))
        .and_then(Value::as_array)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ValidationError::NoRoutings { path: path.clone() })?;

    for (routing_index, routing) in routings.iter().enumerate() {
        validate_routing(&format!("{path}.routings[{routing_index}]"), routing)?;
    }

    Ok(())
}

fn validate_routing(path: &str, routing: &Value) -> Result<(), ValidationError> {
    let fields = routing.as_object();

    if non_empty_str(fields, "name").is_none() {
        return Err(ValidationError::MissingName { path: path.to_string() });
    }

    let target = fields
        .and_then(|f| f.get("redirectTarget"))
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::MissingRedirectTarget { path: path.to_string() })?;

    if Url::parse(target).is_err() {
        return Err(ValidationError::InvalidRedirectTarget {
            path: path.to_string(),
            target: target.to_string(),
        });
    }

    Ok(())
}

fn non_empty_str<'a>(fields: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a str> {
    fields?.get(key)?.as_str().filter(|s| !s.is_empty())
}

fn check_unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(fold_case(name)) {
            return Err(ValidationError::DuplicateGroupName { name: name.to_string() });
        }
    }
    Ok(())
}
