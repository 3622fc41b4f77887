//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming URL (absolute, or path + query)
//!     → request.rs (decompose into path + parameter map)
//!     → engine.rs (group lookup, then routing lookup)
//!     → matcher.rs (evaluate name and parameter conditions)
//!     → Return: RedirectMatch or NoMatchReason
//!
//! router.rs owns the active routing table and ties the steps together.
//! ```
//!
//! # Design Decisions
//! - Tables are validated before install, immutable afterwards
//! - Two levels only: group by path, routing by parameter condition
//! - Deterministic: same input always resolves the same way
//! - First match wins at both levels (declaration order)

pub mod engine;
pub mod matcher;
pub mod request;
pub mod router;

pub use engine::{resolve, EngineError, MatchResult, NoMatchReason, RedirectMatch};
pub use request::{decompose, ParameterMap, RequestTarget};
pub use router::{RedirectRouter, ResolveError, RouterStatus};
