use std::collections::HashMap;

use media_authz::{
    AuthzConfig, BearerClaims, Claim, ClaimSource, DecisionKind, FederatedClaims, Identity,
    MediaAuthorizer, ProfileAttributes, SourceError, SourceKind,
};

const MEDIA_PATH: &str = "/-/media/secure/alaska/report.pdf";

fn authorizer() -> MediaAuthorizer {
    MediaAuthorizer::new(AuthzConfig::default()).unwrap()
}

fn bearer_identity(name: &str, claims: Vec<Claim>) -> Identity {
    Identity::authenticated(name, vec![Box::new(BearerClaims::new(claims))])
}

/// Claim source that always fails, standing in for a broken upstream.
struct FailingSource;

impl ClaimSource for FailingSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Federated
    }

    fn claim_identifiers(&self) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Unavailable("identity provider offline".into()))
    }

    fn has_claim(&self, _claim_name: &str, _claim_url_base: &str) -> Result<bool, SourceError> {
        Err(SourceError::Query("identity provider offline".into()))
    }
}

#[test]
fn unauthenticated_identity_is_denied_regardless_of_claims() {
    let engine = authorizer();
    let mut identity = bearer_identity(
        "kai",
        vec![Claim::new("https://ipcoop.com/claims/hasAlaskaState", "true")],
    );
    identity.authenticated = false;

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(!decision.authorized);
    assert!(!decision.authenticated);
    assert_eq!(decision.kind, DecisionKind::Unauthenticated);
    assert!(decision.reason.contains("not authenticated"));
}

#[test]
fn missing_identity_is_denied() {
    let engine = authorizer();
    let decision = engine.authorize(None, "IsAlaskaUser", MEDIA_PATH);
    assert!(!decision.authorized);
    assert!(!decision.authenticated);
}

#[test]
fn anonymous_identity_is_denied() {
    let engine = authorizer();
    let identity = Identity::anonymous();
    let decision = engine.authorize(Some(&identity), "IsHawaiiUser", MEDIA_PATH);
    assert_eq!(decision.kind, DecisionKind::Unauthenticated);
    assert_eq!(decision.username, "Anonymous");
}

#[test]
fn unknown_rule_is_denied_even_with_claims() {
    let engine = authorizer();
    let identity = bearer_identity(
        "kai",
        vec![
            Claim::new("hasAlaskaState", "true"),
            Claim::new("hasHawaiiState", "true"),
        ],
    );

    let decision = engine.authorize(Some(&identity), "DoesNotExist", MEDIA_PATH);
    assert!(!decision.authorized);
    assert!(decision.authenticated);
    assert_eq!(decision.kind, DecisionKind::UnknownRule);
    assert!(decision.reason.contains("unknown rule"));
    assert_eq!(engine.required_claim_for("DoesNotExist"), None);
}

#[test]
fn full_url_claim_type_authorizes() {
    let engine = authorizer();
    let identity = bearer_identity(
        "kai",
        vec![Claim::new("https://ipcoop.com/claims/hasAlaskaState", "true")],
    );

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(decision.authorized);
    assert!(decision.authenticated);
    assert_eq!(decision.matched_claim.as_deref(), Some("hasAlaskaState"));
}

#[test]
fn short_name_claim_type_authorizes() {
    let engine = authorizer();
    let identity = bearer_identity("kai", vec![Claim::new("hasalaskastate", "true")]);

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(decision.authorized);
}

#[test]
fn claim_carried_in_value_authorizes() {
    let engine = authorizer();
    let identity = bearer_identity("kai", vec![Claim::new("state_access", "hasAlaskaState")]);

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(decision.authorized);
}

#[test]
fn profile_attribute_authorizes_with_qualified_claim() {
    let engine = authorizer();
    let mut attributes = HashMap::new();
    attributes.insert("HasAlaskaState".to_string(), "1".to_string());
    let identity = Identity::authenticated(
        "kai",
        vec![Box::new(ProfileAttributes::new(attributes))],
    );

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(decision.authorized);
    assert_eq!(
        decision.matched_claim.as_deref(),
        Some("profile.hasAlaskaState")
    );
}

#[test]
fn false_profile_attribute_does_not_authorize() {
    let engine = authorizer();
    let mut attributes = HashMap::new();
    attributes.insert("HasAlaskaState".to_string(), "no".to_string());
    let identity = Identity::authenticated(
        "kai",
        vec![Box::new(ProfileAttributes::new(attributes))],
    );

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(!decision.authorized);
    assert_eq!(decision.kind, DecisionKind::Forbidden);
}

#[test]
fn authenticated_without_matching_claim_is_forbidden_with_audit_trail() {
    let engine = authorizer();
    let identity = bearer_identity(
        "kai",
        vec![
            Claim::new("hasCanadaState", "true"),
            Claim::new("email", "kai@example.com"),
        ],
    );

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(!decision.authorized);
    assert!(decision.authenticated);
    assert_eq!(decision.kind, DecisionKind::Forbidden);
    assert!(decision.reason.contains("IsAlaskaUser"));
    assert!(decision.reason.contains("hasAlaskaState"));
    assert_eq!(
        decision.observed_claims,
        vec!["hasCanadaState".to_string(), "email".to_string()]
    );
}

#[test]
fn failing_source_does_not_mask_a_later_match() {
    let engine = authorizer();
    let identity = Identity::authenticated(
        "kai",
        vec![
            Box::new(FailingSource),
            Box::new(FederatedClaims::new(vec![Claim::new(
                "hasAlaskaState",
                "true",
            )])),
        ],
    );

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(decision.authorized);
    assert_eq!(decision.matched_claim.as_deref(), Some("hasAlaskaState"));
}

#[test]
fn all_sources_failing_fails_closed() {
    let engine = authorizer();
    let identity = Identity::authenticated("kai", vec![Box::new(FailingSource)]);

    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(!decision.authorized);
    assert_eq!(decision.kind, DecisionKind::Forbidden);
    assert!(decision.observed_claims.is_empty());
}

#[test]
fn rule_names_resolve_case_insensitively() {
    let engine = authorizer();
    for rule in ["IsHawaiiUser", "ishawaiiuser", "ISHAWAIIUSER"] {
        assert_eq!(engine.required_claim_for(rule), Some("hasHawaiiState"));
    }

    let identity = bearer_identity("kai", vec![Claim::new("hasHawaiiState", "true")]);
    let decision = engine.authorize(Some(&identity), "ISHAWAIIUSER", MEDIA_PATH);
    assert!(decision.authorized);
}

#[test]
fn identical_inputs_yield_identical_decisions() {
    let engine = authorizer();
    let identity = bearer_identity("kai", vec![Claim::new("hasAlaskaState", "true")]);

    let first = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    let second = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert_eq!(first, second);
}

#[test]
fn custom_rule_table_replaces_defaults() {
    let mut rules = HashMap::new();
    rules.insert("IsStaffUser".to_string(), "hasStaffBadge".to_string());
    let engine = MediaAuthorizer::new(AuthzConfig {
        rules,
        ..AuthzConfig::default()
    })
    .unwrap();

    assert_eq!(engine.required_claim_for("isstaffuser"), Some("hasStaffBadge"));
    assert_eq!(engine.required_claim_for("IsHawaiiUser"), None);

    let identity = bearer_identity("kai", vec![Claim::new("hasStaffBadge", "true")]);
    let decision = engine.authorize(Some(&identity), "IsStaffUser", MEDIA_PATH);
    assert!(decision.authorized);
}

#[test]
fn malformed_rule_table_is_rejected_at_construction() {
    let mut rules = HashMap::new();
    rules.insert("IsStaffUser".to_string(), "".to_string());
    let result = MediaAuthorizer::new(AuthzConfig {
        rules,
        ..AuthzConfig::default()
    });
    assert!(result.is_err());
}

#[test]
fn disabled_flag_is_exposed_but_decisions_still_evaluate() {
    let engine = MediaAuthorizer::new(AuthzConfig {
        enabled: false,
        ..AuthzConfig::default()
    })
    .unwrap();
    assert!(!engine.is_enabled());

    let identity = bearer_identity("kai", vec![Claim::new("hasAlaskaState", "true")]);
    let decision = engine.authorize(Some(&identity), "IsAlaskaUser", MEDIA_PATH);
    assert!(decision.authorized);
}

#[test]
fn decision_is_request_specific_across_principals() {
    let engine = authorizer();
    let holder = bearer_identity("kai", vec![Claim::new("hasAlaskaState", "true")]);
    let other = bearer_identity("lee", vec![Claim::new("hasCanadaState", "true")]);

    assert!(engine.authorize(Some(&holder), "IsAlaskaUser", MEDIA_PATH).authorized);
    assert!(!engine.authorize(Some(&other), "IsAlaskaUser", MEDIA_PATH).authorized);
}
