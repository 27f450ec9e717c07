//! Claim sources and the OR-logic aggregation over them.

use std::collections::HashMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::SourceError;
use crate::model::SourceKind;

/// A single claim as carried by a claims-style source: a type identifier
/// plus an optional value payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// A source capable of answering whether an identity holds a claim.
///
/// Implementations must not block unboundedly; any I/O they perform has to
/// complete (or fail) before returning. A returned error marks the claim as
/// absent for this source only and never aborts the aggregate check.
pub trait ClaimSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// All claim identifiers this source knows about, for audit logging.
    fn claim_identifiers(&self) -> Result<Vec<String>, SourceError>;

    /// Whether this source holds `claim_name`, in any of the accepted forms.
    fn has_claim(&self, claim_name: &str, claim_url_base: &str) -> Result<bool, SourceError>;
}

/// Builds the full-URL form of a claim name.
///
/// The base loses any trailing slash, the name loses any leading slash, and
/// the two are joined with a single `/`. An empty base yields the bare name.
pub fn full_claim_url(claim_name: &str, claim_url_base: &str) -> String {
    if claim_url_base.is_empty() {
        return claim_name.to_string();
    }
    let base = claim_url_base.trim_end_matches('/');
    let name = claim_name.trim_start_matches('/');
    format!("{base}/{name}")
}

/// OR-logic match over a typed claim list: the claim type may equal the
/// full-URL form or the short name, or either form may appear as a claim
/// value (some issuers store the flag in the value rather than the type).
/// All comparisons ignore case.
fn claims_match(claims: &[Claim], claim_name: &str, claim_url_base: &str) -> bool {
    if claim_name.is_empty() {
        return false;
    }
    let full_url = full_claim_url(claim_name, claim_url_base);
    claims.iter().any(|claim| {
        claim.kind.eq_ignore_ascii_case(&full_url)
            || claim.kind.eq_ignore_ascii_case(claim_name)
            || claim.value.eq_ignore_ascii_case(claim_name)
            || claim.value.eq_ignore_ascii_case(&full_url)
    })
}

/// Lenient boolean parsing for profile attribute values.
/// `true`/`yes`/`1` (any case) are true; everything else is false.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
}

/// Claims attached to the request's bearer token.
#[derive(Clone, Debug, Default)]
pub struct BearerClaims {
    claims: Vec<Claim>,
}

impl BearerClaims {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }
}

impl ClaimSource for BearerClaims {
    fn kind(&self) -> SourceKind {
        SourceKind::Bearer
    }

    fn claim_identifiers(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.claims.iter().map(|claim| claim.kind.clone()).collect())
    }

    fn has_claim(&self, claim_name: &str, claim_url_base: &str) -> Result<bool, SourceError> {
        Ok(claims_match(&self.claims, claim_name, claim_url_base))
    }
}

/// Claims issued by a federated identity provider for the signed-in user.
/// Matching is identical to bearer claims; only the trust provenance differs.
#[derive(Clone, Debug, Default)]
pub struct FederatedClaims {
    claims: Vec<Claim>,
}

impl FederatedClaims {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }
}

impl ClaimSource for FederatedClaims {
    fn kind(&self) -> SourceKind {
        SourceKind::Federated
    }

    fn claim_identifiers(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.claims.iter().map(|claim| claim.kind.clone()).collect())
    }

    fn has_claim(&self, claim_name: &str, claim_url_base: &str) -> Result<bool, SourceError> {
        Ok(claims_match(&self.claims, claim_name, claim_url_base))
    }
}

/// Custom profile attributes keyed by name, with boolean-ish string values.
///
/// Unlike claims-style sources this matches on exact attribute name only
/// (no URL form) and the attribute value decides presence.
#[derive(Clone, Debug, Default)]
pub struct ProfileAttributes {
    attributes: HashMap<String, String>,
}

impl ProfileAttributes {
    pub fn new(attributes: HashMap<String, String>) -> Self {
        Self { attributes }
    }
}

impl ClaimSource for ProfileAttributes {
    fn kind(&self) -> SourceKind {
        SourceKind::Profile
    }

    fn claim_identifiers(&self) -> Result<Vec<String>, SourceError> {
        Ok(self
            .attributes
            .iter()
            .filter(|(_, value)| parse_flag(value))
            .map(|(name, _)| format!("profile.{name}"))
            .collect())
    }

    fn has_claim(&self, claim_name: &str, _claim_url_base: &str) -> Result<bool, SourceError> {
        if claim_name.is_empty() {
            return Ok(false);
        }
        let value = self
            .attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(claim_name))
            .map(|(_, value)| value.as_str());
        Ok(value.map(parse_flag).unwrap_or(false))
    }
}

/// A claim match, labeled with the form that matched and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimMatch {
    pub claim: String,
    pub source: SourceKind,
}

/// Walks the sources in declared order and short-circuits on the first one
/// holding `required_claim`. A failing source is logged and skipped; it can
/// neither deny a later match nor mask its own failure from the logs.
pub fn has_required_claim(
    sources: &[Box<dyn ClaimSource>],
    required_claim: &str,
    claim_url_base: &str,
) -> Option<ClaimMatch> {
    for source in sources {
        match source.has_claim(required_claim, claim_url_base) {
            Ok(true) => {
                let claim = match source.kind() {
                    SourceKind::Profile => format!("profile.{required_claim}"),
                    _ => required_claim.to_string(),
                };
                return Some(ClaimMatch {
                    claim,
                    source: source.kind(),
                });
            }
            Ok(false) => {}
            Err(err) => {
                warn!(
                    target: "media-authz",
                    source = %source.kind(),
                    claim = required_claim,
                    error = %err,
                    "claim source failed; treating claim as absent for this source"
                );
            }
        }
    }
    None
}

/// Gathers every claim identifier across all sources for the audit trail.
/// Deduplicated case-insensitively, first-seen order preserved. Failing
/// sources contribute nothing.
pub fn collect_claims(sources: &[Box<dyn ClaimSource>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut observed = Vec::new();
    for source in sources {
        let identifiers = match source.claim_identifiers() {
            Ok(identifiers) => identifiers,
            Err(err) => {
                warn!(
                    target: "media-authz",
                    source = %source.kind(),
                    error = %err,
                    "claim source failed while listing claims"
                );
                continue;
            }
        };
        for identifier in identifiers {
            if seen.insert(identifier.to_lowercase()) {
                observed.push(identifier);
            }
        }
    }
    observed
}
