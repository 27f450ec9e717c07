//! The authorization decision engine.

use crate::claims::{collect_claims, has_required_claim};
use crate::config::AuthzConfig;
use crate::errors::ConfigError;
use crate::logging;
use crate::model::{AccessDecision, Identity};
use crate::registry::RuleRegistry;

/// Decides, per request, whether an identity may retrieve a media asset
/// guarded by a named rule.
///
/// Stateless across calls apart from the immutable rule table, so one
/// instance can be shared across any number of concurrent requests without
/// locking. `authorize` never panics and never returns an error: every
/// fault inside a call collapses to denial (fail-closed).
pub struct MediaAuthorizer {
    registry: RuleRegistry,
    claim_url_base: String,
    enabled: bool,
}

impl MediaAuthorizer {
    /// Builds the engine from validated configuration. A malformed rule
    /// table is the only error surfaced to the caller, and only here —
    /// never per request.
    pub fn new(config: AuthzConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        logging::log_configuration(config.enabled, &config.claim_url_base, config.rules.len());
        Ok(Self {
            registry: RuleRegistry::from_map(&config.rules),
            claim_url_base: config.claim_url_base,
            enabled: config.enabled,
        })
    }

    /// The single decision entry point.
    ///
    /// Terminal outcomes, in evaluation order:
    /// 1. missing or unauthenticated identity → unauthenticated denial
    /// 2. rule name not in the registry → unknown-rule denial
    /// 3. any source holds the required claim → authorized
    /// 4. otherwise → forbidden, with the observed claim set for audit
    pub fn authorize(
        &self,
        identity: Option<&Identity>,
        rule_name: &str,
        media_path: &str,
    ) -> AccessDecision {
        let identity = match identity {
            Some(identity) if identity.authenticated => identity,
            _ => {
                let decision = AccessDecision::unauthenticated(rule_name, media_path);
                logging::log_decision(&decision);
                return decision;
            }
        };

        let required_claim = match self.registry.resolve(rule_name) {
            Some(claim) => claim,
            None => {
                let decision =
                    AccessDecision::unknown_rule(identity.name.as_str(), rule_name, media_path);
                logging::log_decision(&decision);
                return decision;
            }
        };

        match has_required_claim(&identity.sources, required_claim, &self.claim_url_base) {
            Some(matched) => {
                logging::log_claim_check(&identity.name, required_claim, true, matched.source);
                let observed = collect_claims(&identity.sources);
                let decision = AccessDecision::success(
                    identity.name.as_str(),
                    rule_name,
                    matched.claim,
                    observed,
                    media_path,
                );
                logging::log_decision(&decision);
                decision
            }
            None => {
                let observed = collect_claims(&identity.sources);
                let decision = AccessDecision::forbidden(
                    identity.name.as_str(),
                    rule_name,
                    required_claim,
                    observed,
                    media_path,
                );
                logging::log_decision(&decision);
                decision
            }
        }
    }

    /// Required-claim metadata for a rule, for callers that pre-check or
    /// display it. `None` for unknown or empty rule names.
    pub fn required_claim_for(&self, rule_name: &str) -> Option<&str> {
        self.registry.resolve(rule_name)
    }

    /// Whether the feature is switched on in configuration. The engine
    /// itself always evaluates; skipping enforcement when disabled is the
    /// caller's pipeline concern.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
