//! Redirect resolution engine.
//!
//! # Responsibilities
//! - Select the first group whose name and condition match the request
//! - Select the first routing inside that group whose condition matches
//! - Fall back to a lone unconditional routing when nothing matched
//! - Report misses as data, not errors
//!
//! # Design Decisions
//! - Declaration order is authoritative at both levels (first match wins)
//! - Pure function of (table, request): same input, same result
//! - Errors only for structurally broken tables, which validation rejects

use thiserror::Error;

use crate::config::schema::{Routing, RoutingConfiguration, RoutingGroup};
use crate::routing::matcher::{AllOf, GroupNameMatcher, Matcher};
use crate::routing::request::RequestTarget;

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectMatch {
    pub target_url: String,
    pub group_name: String,
    pub routing_name: String,
}

/// Why a request did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoMatchReason {
    #[error("no matching routing group found")]
    NoGroup,

    #[error("no matching routing found")]
    NoRouting,
}

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Found(RedirectMatch),
    NotFound(NoMatchReason),
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn target_url(&self) -> Option<&str> {
        match self {
            Self::Found(m) => Some(&m.target_url),
            Self::NotFound(_) => None,
        }
    }
}

/// The routing table violates an invariant validation guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("routing table has no groups")]
    NoGroups,

    #[error("routing group '{0}' has no routings")]
    EmptyGroup(String),
}

/// Resolve a request against a routing table.
pub fn resolve(
    config: &RoutingConfiguration,
    request: &RequestTarget,
) -> Result<MatchResult, EngineError> {
    if config.groups.is_empty() {
        return Err(EngineError::NoGroups);
    }

    let Some(group) = select_group(config, request) else {
        tracing::debug!(path = %request.path, "No routing group matched");
        return Ok(MatchResult::NotFound(NoMatchReason::NoGroup));
    };

    if group.routings.is_empty() {
        return Err(EngineError::EmptyGroup(group.name.clone()));
    }

    let Some(routing) = select_routing(group, request).or_else(|| lone_default(group)) else {
        tracing::debug!(path = %request.path, group = %group.name, "No routing matched");
        return Ok(MatchResult::NotFound(NoMatchReason::NoRouting));
    };

    tracing::debug!(
        path = %request.path,
        group = %group.name,
        routing = %routing.name,
        target = %routing.redirect_target,
        "Routing selected"
    );

    Ok(MatchResult::Found(RedirectMatch {
        target_url: routing.redirect_target.clone(),
        group_name: group.name.clone(),
        routing_name: routing.name.clone(),
    }))
}

fn select_group<'a>(
    config: &'a RoutingConfiguration,
    request: &RequestTarget,
) -> Option<&'a RoutingGroup> {
    config
        .groups
        .iter()
        .find(|group| AllOf(GroupNameMatcher::new(&group.name), group.condition()).matches(request))
}

fn select_routing<'a>(group: &'a RoutingGroup, request: &RequestTarget) -> Option<&'a Routing> {
    group
        .routings
        .iter()
        .find(|routing| routing.condition().matches(request))
}

/// A group holding exactly one unconditional routing always resolves to it.
fn lone_default(group: &RoutingGroup) -> Option<&Routing> {
    match group.routings.as_slice() {
        [only] if only.condition().is_none() => Some(only),
        _ => None,
    }
}
