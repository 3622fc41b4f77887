//! Rule matching logic.
//!
//! # Responsibilities
//! - Match the request path against a group name (case-insensitive)
//! - Match a dependency condition against the request parameters
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Group names compare case-insensitively, parameter values exactly
//! - No trimming or normalization of values: `"123 "` is not `"123"`
//! - An absent condition always matches
//! - No regex or wildcards, plain equality only

use crate::config::schema::Condition;
use crate::routing::request::RequestTarget;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, request: &RequestTarget) -> bool;
}

/// Matches the request path against a group name.
#[derive(Debug, Clone, Copy)]
pub struct GroupNameMatcher<'a> {
    name: &'a str,
}

impl<'a> GroupNameMatcher<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }
}

impl Matcher for GroupNameMatcher<'_> {
    fn matches(&self, request: &RequestTarget) -> bool {
        eq_ignore_case(&request.path, self.name)
    }
}

/// A parameter condition holds when the key is present with exactly the
/// required value. A missing key never matches, not even an empty value.
impl Matcher for Condition<'_> {
    fn matches(&self, request: &RequestTarget) -> bool {
        request.params.get(self.key) == Some(self.value)
    }
}

impl<M: Matcher> Matcher for Option<M> {
    fn matches(&self, request: &RequestTarget) -> bool {
        self.as_ref().map_or(true, |m| m.matches(request))
    }
}

/// Combines two matchers with AND semantics.
#[derive(Debug, Clone, Copy)]
pub struct AllOf<A, B>(pub A, pub B);

impl<A: Matcher, B: Matcher> Matcher for AllOf<A, B> {
    fn matches(&self, request: &RequestTarget) -> bool {
        self.0.matches(request) && self.1.matches(request)
    }
}

/// Lowercases char by char, ignoring word context, so a final `Σ` folds to
/// `σ` like any other. Group-name uniqueness keys go through this too.
fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Unicode-aware case-insensitive comparison without allocating.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    folded(a).eq(folded(b))
}

/// The case-folded form under which [`eq_ignore_case`] considers two names
/// equal.
pub fn fold_case(s: &str) -> String {
    folded(s).collect()
}
