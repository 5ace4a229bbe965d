//! Identity tokens issued and verified against a simulated clock.

use std::sync::Arc;

use super::helpers::clock;
use chrono::Duration;
use rstest::rstest;
use taskflow::{
    auth::{domain::TokenError, services::TokenService},
    clock::ManualClock,
    config::TokenConfig,
};

const SECRET: &str = "integrationSecretKey-0123456789abcdefghij";

fn service(clock: &ManualClock, secret: &str) -> TokenService<ManualClock> {
    let config = TokenConfig {
        secret: secret.to_owned(),
        lifetime_secs: 3600,
    };
    TokenService::new(&config, Arc::new(clock.clone())).expect("token config is valid")
}

#[rstest]
fn alice_token_verifies_then_expires(clock: ManualClock) {
    let tokens = service(&clock, SECRET);
    let token = tokens
        .issue("alice", ["ROLE_USER"])
        .expect("issue should succeed");

    let verified = tokens.verify(&token).expect("fresh token verifies");
    assert_eq!(verified.subject(), "alice");
    assert!(verified.has_capability("ROLE_USER"));
    assert_eq!(
        verified.expires_at() - verified.issued_at(),
        Duration::hours(1)
    );

    clock.advance(Duration::hours(2));

    assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    assert_eq!(tokens.extract_subject(&token), Err(TokenError::Expired));
}

#[rstest]
fn token_from_another_deployment_is_rejected(clock: ManualClock) {
    let foreign = service(&clock, "someOtherDeploymentSecret-0123456789abcdef")
        .issue("mallory", ["ROLE_ADMIN"])
        .expect("issue should succeed");

    let result = service(&clock, SECRET).verify(&foreign);

    assert_eq!(result, Err(TokenError::SignatureInvalid));
}

#[rstest]
#[case::empty("")]
#[case::garbage("not-a-token")]
#[case::two_segments("abc.def")]
fn structurally_invalid_tokens_are_malformed(clock: ManualClock, #[case] token: &str) {
    let result = service(&clock, SECRET).verify(token);

    assert!(matches!(result, Err(TokenError::MalformedToken(_))));
}
