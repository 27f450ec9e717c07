use std::fmt;

use serde::{Deserialize, Serialize};

use crate::claims::ClaimSource;

/// Identity descriptor built by the caller for each request.
///
/// The engine never mutates it; claim sources are queried in the order they
/// appear here, so callers should list the strongest trust signals first
/// (bearer/federated claims before profile attributes).
pub struct Identity {
    pub authenticated: bool,
    pub name: String,
    pub sources: Vec<Box<dyn ClaimSource>>,
}

impl Identity {
    pub fn authenticated(name: impl Into<String>, sources: Vec<Box<dyn ClaimSource>>) -> Self {
        Self {
            authenticated: true,
            name: name.into(),
            sources,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            name: "Anonymous".to_string(),
            sources: Vec::new(),
        }
    }
}

/// Kind of claim source that produced a match, used in logs and in
/// provider-qualified claim labels.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Bearer,
    Federated,
    Profile,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Bearer => "bearer",
            SourceKind::Federated => "federated",
            SourceKind::Profile => "profile",
        };
        f.write_str(label)
    }
}

/// Terminal outcome categories of an authorization decision.
///
/// `UnknownRule` denies exactly like `Forbidden` but is kept distinct so a
/// misconfigured rule table is visible in logs and audits.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DecisionKind {
    Authorized,
    Unauthenticated,
    UnknownRule,
    Forbidden,
}

/// Immutable result of one authorization call.
///
/// Constructed exactly once per call through one of the named constructors
/// below, consumed by logging and by the caller's response shaping. Never
/// persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessDecision {
    pub kind: DecisionKind,
    pub authorized: bool,
    pub authenticated: bool,
    pub username: String,
    pub rule_name: String,
    pub matched_claim: Option<String>,
    /// Every claim identifier observed across all sources, deduplicated
    /// case-insensitively. Audit/diagnostic only, never decision-bearing.
    pub observed_claims: Vec<String>,
    pub reason: String,
    pub media_path: String,
}

impl AccessDecision {
    pub fn success(
        username: impl Into<String>,
        rule_name: impl Into<String>,
        matched_claim: impl Into<String>,
        observed_claims: Vec<String>,
        media_path: impl Into<String>,
    ) -> Self {
        let rule_name = rule_name.into();
        let matched_claim = matched_claim.into();
        let reason = format!("user has required claim '{matched_claim}' for rule '{rule_name}'");
        Self {
            kind: DecisionKind::Authorized,
            authorized: true,
            authenticated: true,
            username: username.into(),
            rule_name,
            matched_claim: Some(matched_claim),
            observed_claims,
            reason,
            media_path: media_path.into(),
        }
    }

    pub fn unauthenticated(rule_name: impl Into<String>, media_path: impl Into<String>) -> Self {
        let rule_name = rule_name.into();
        let reason = format!("user is not authenticated; rule '{rule_name}' requires authentication");
        Self {
            kind: DecisionKind::Unauthenticated,
            authorized: false,
            authenticated: false,
            username: "Anonymous".to_string(),
            rule_name,
            matched_claim: None,
            observed_claims: Vec::new(),
            reason,
            media_path: media_path.into(),
        }
    }

    pub fn unknown_rule(
        username: impl Into<String>,
        rule_name: impl Into<String>,
        media_path: impl Into<String>,
    ) -> Self {
        let rule_name = rule_name.into();
        let reason = format!("unknown rule '{rule_name}': no required claim is configured for it");
        Self {
            kind: DecisionKind::UnknownRule,
            authorized: false,
            authenticated: true,
            username: username.into(),
            rule_name,
            matched_claim: None,
            observed_claims: Vec::new(),
            reason,
            media_path: media_path.into(),
        }
    }

    pub fn forbidden(
        username: impl Into<String>,
        rule_name: impl Into<String>,
        required_claim: impl Into<String>,
        observed_claims: Vec<String>,
        media_path: impl Into<String>,
    ) -> Self {
        let rule_name = rule_name.into();
        let required_claim = required_claim.into();
        let reason = format!(
            "user lacks required claim '{}' for rule '{}'; observed claims: [{}]",
            required_claim,
            rule_name,
            observed_claims.join(", ")
        );
        Self {
            kind: DecisionKind::Forbidden,
            authorized: false,
            authenticated: true,
            username: username.into(),
            rule_name,
            matched_claim: None,
            observed_claims,
            reason,
            media_path: media_path.into(),
        }
    }
}
