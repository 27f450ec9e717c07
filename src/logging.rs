//! Structured log emission for authorization events.
//!
//! Every decision produces exactly one log line; claim-check traces and the
//! startup configuration dump are there for troubleshooting across
//! environments.

use tracing::{debug, error, info, warn};

use crate::model::{AccessDecision, DecisionKind, SourceKind};

const TARGET: &str = "media-authz";

pub fn log_decision(decision: &AccessDecision) {
    match decision.kind {
        DecisionKind::Authorized => info!(
            target: TARGET,
            user = %decision.username,
            media_path = %decision.media_path,
            rule = %decision.rule_name,
            matched_claim = decision.matched_claim.as_deref().unwrap_or(""),
            "authorized"
        ),
        DecisionKind::Unauthenticated => warn!(
            target: TARGET,
            media_path = %decision.media_path,
            rule = %decision.rule_name,
            reason = %decision.reason,
            "unauthorized: not authenticated"
        ),
        DecisionKind::UnknownRule => error!(
            target: TARGET,
            user = %decision.username,
            media_path = %decision.media_path,
            rule = %decision.rule_name,
            "unknown rule name; check the rule table configuration"
        ),
        DecisionKind::Forbidden => warn!(
            target: TARGET,
            user = %decision.username,
            media_path = %decision.media_path,
            rule = %decision.rule_name,
            observed_claims = %decision.observed_claims.join(", "),
            reason = %decision.reason,
            "forbidden"
        ),
    }
}

pub fn log_claim_check(username: &str, claim: &str, found: bool, source: SourceKind) {
    debug!(
        target: TARGET,
        user = username,
        claim = claim,
        found = found,
        source = %source,
        "claim check"
    );
}

pub fn log_configuration(enabled: bool, claim_url_base: &str, rule_count: usize) {
    info!(
        target: TARGET,
        enabled = enabled,
        claim_url_base = claim_url_base,
        rule_count = rule_count,
        "media authorization configured"
    );
}
