//! Claims-based authorization engine for protected media assets.
//!
//! A named access rule on a media folder maps to one required claim; the
//! engine aggregates claims from ordered, heterogeneous sources (bearer
//! token, federated identity, profile attributes) with OR logic and returns
//! a structured, loggable decision. Denial is the default on every
//! ambiguity or fault.

pub mod claims;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod model;
pub mod registry;

pub use claims::{
    collect_claims, full_claim_url, has_required_claim, BearerClaims, Claim, ClaimMatch,
    ClaimSource, FederatedClaims, ProfileAttributes,
};
pub use config::{
    default_rules, load_config_from_path, load_config_from_reader, parse_config_str, AuthzConfig,
};
pub use engine::MediaAuthorizer;
pub use errors::{ConfigError, SourceError};
pub use model::{AccessDecision, DecisionKind, Identity, SourceKind};
pub use registry::RuleRegistry;
