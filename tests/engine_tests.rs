mod common;

use autossh::classifier::{AttemptOutcome, SshClassifier};
use autossh::dictionary::Dictionary;
use autossh::engine::{AbortReason, AttackEngine, AttackResult, AttackSettings, DEFAULT_ATTEMPT_TIMEOUT};
use common::{passwords, resolved, FakeAuthenticator, FakeHost, ScriptedClassifier};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn engine(auth: &FakeAuthenticator, classifier: &ScriptedClassifier) -> AttackEngine {
    AttackEngine::new(
        AttackSettings::new(2222, Duration::from_millis(500)),
        Box::new(auth.clone()),
        Box::new(classifier.clone()),
    )
}

#[tokio::test]
async fn test_all_rejected_returns_not_found_after_every_candidate() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::rejecting();
    let dictionary = Dictionary::from(passwords(&["alpha", "beta", "gamma", "delta"]));

    let result = engine(&auth, &classifier)
        .attack(&resolved("alice@box.local", "10.0.0.5"), &dictionary, &CancellationToken::new())
        .await;

    assert_eq!(result, AttackResult::NotFound);
    assert_eq!(classifier.call_count(), 4);
    assert_eq!(auth.passwords_tried(), passwords(&["alpha", "beta", "gamma", "delta"]));
}

#[tokio::test]
async fn test_stops_at_first_success() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::success_on(3);
    let dictionary = Dictionary::from(passwords(&["p1", "p2", "p3", "p4", "p5"]));

    let result = engine(&auth, &classifier)
        .attack(&resolved("alice@box.local", "10.0.0.5"), &dictionary, &CancellationToken::new())
        .await;

    assert_eq!(result, AttackResult::Found("p3".to_string()));
    assert_eq!(result.password(), Some("p3"));
    assert_eq!(classifier.call_count(), 3);
    assert_eq!(auth.attempt_count(), 3);
}

#[tokio::test]
async fn test_success_on_first_candidate_makes_one_attempt() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::success_on(1);
    let dictionary = Dictionary::from(passwords(&["root", "toor"]));

    let result = engine(&auth, &classifier)
        .attack(&resolved("root@10.0.0.1", "10.0.0.1"), &dictionary, &CancellationToken::new())
        .await;

    assert_eq!(result, AttackResult::Found("root".to_string()));
    assert_eq!(classifier.call_count(), 1);
}

#[tokio::test]
async fn test_unreachable_aborts_after_one_attempt() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::new(vec![AttemptOutcome::Unreachable("connection refused".to_string())]);
    let dictionary = Dictionary::from(passwords(&["a", "b", "c", "d", "e", "f"]));

    let result = engine(&auth, &classifier)
        .attack(&resolved("bob@host", "10.0.0.9"), &dictionary, &CancellationToken::new())
        .await;

    assert_eq!(
        result,
        AttackResult::Aborted(AbortReason::Unreachable("connection refused".to_string()))
    );
    assert_eq!(classifier.call_count(), 1);
    assert_eq!(auth.attempt_count(), 1);
}

#[tokio::test]
async fn test_protocol_error_aborts_mid_dictionary() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::new(vec![
        AttemptOutcome::AuthRejected,
        AttemptOutcome::ProtocolError("kex mismatch".to_string()),
        AttemptOutcome::Success,
    ]);
    let dictionary = Dictionary::from(passwords(&["a", "b", "c"]));

    let result = engine(&auth, &classifier)
        .attack(&resolved("bob@host", "10.0.0.9"), &dictionary, &CancellationToken::new())
        .await;

    assert_eq!(result, AttackResult::Aborted(AbortReason::Protocol("kex mismatch".to_string())));
    assert_eq!(classifier.call_count(), 2);
}

#[tokio::test]
async fn test_empty_dictionary_makes_no_attempts() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::success_on(1);

    let result = engine(&auth, &classifier)
        .attack(&resolved("bob@host", "10.0.0.9"), &Dictionary::default(), &CancellationToken::new())
        .await;

    assert_eq!(result, AttackResult::NotFound);
    assert_eq!(classifier.call_count(), 0);
    assert_eq!(auth.attempt_count(), 0);
}

#[tokio::test]
async fn test_cancelled_token_stops_before_next_attempt() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::rejecting();
    let dictionary = Dictionary::from(passwords(&["a", "b"]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = engine(&auth, &classifier)
        .attack(&resolved("bob@host", "10.0.0.9"), &dictionary, &cancel)
        .await;

    assert_eq!(result, AttackResult::Aborted(AbortReason::Cancelled));
    assert_eq!(auth.attempt_count(), 0);
}

#[tokio::test]
async fn test_cancel_during_delay_skips_next_attempt() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::rejecting();
    let dictionary = Dictionary::from(passwords(&["a", "b"]));
    let engine = AttackEngine::new(
        AttackSettings::new(22, Duration::from_millis(500)).with_delay(Duration::from_secs(5)),
        Box::new(auth.clone()),
        Box::new(classifier.clone()),
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = engine
        .attack(&resolved("bob@host", "10.0.0.9"), &dictionary, &cancel)
        .await;

    assert_eq!(result, AttackResult::Aborted(AbortReason::Cancelled));
    assert_eq!(auth.passwords_tried(), passwords(&["a"]));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_attempts_target_resolved_ip_and_port() {
    let auth = FakeAuthenticator::new().host("192.168.1.2", FakeHost::Password("secret".to_string()));
    let engine = AttackEngine::new(
        AttackSettings::new(2222, Duration::from_millis(500)),
        Box::new(auth.clone()),
        Box::new(SshClassifier),
    );
    let dictionary = Dictionary::from(passwords(&["123456", "secret", "password"]));

    let result = engine
        .attack(&resolved("peter@peters-pc.local", "192.168.1.2"), &dictionary, &CancellationToken::new())
        .await;

    assert_eq!(result, AttackResult::Found("secret".to_string()));
    let attempts = auth.attempts.lock().unwrap().clone();
    assert_eq!(attempts.len(), 2);
    for (target, username, _) in attempts {
        assert_eq!(target.to_string(), "192.168.1.2:2222");
        assert_eq!(username, "peter");
    }
}

#[tokio::test]
async fn test_zero_timeout_uses_default() {
    let auth = FakeAuthenticator::new();
    let engine = AttackEngine::new(
        AttackSettings {
            port: 22,
            attempt_timeout: Duration::ZERO,
            delay_between_attempts: Duration::ZERO,
        },
        Box::new(auth.clone()),
        Box::new(ScriptedClassifier::rejecting()),
    );

    assert_eq!(engine.settings().attempt_timeout, DEFAULT_ATTEMPT_TIMEOUT);

    let dictionary = Dictionary::from(passwords(&["x"]));
    engine
        .attack(&resolved("bob@host", "10.0.0.9"), &dictionary, &CancellationToken::new())
        .await;
    assert_eq!(*auth.timeouts.lock().unwrap(), vec![DEFAULT_ATTEMPT_TIMEOUT]);
}

#[tokio::test]
async fn test_accepts_lazy_candidate_stream() {
    let auth = FakeAuthenticator::new();
    let classifier = ScriptedClassifier::success_on(42);
    let candidates = (0..1_000_000).map(|i| format!("pw{}", i));

    let result = engine(&auth, &classifier)
        .attack(&resolved("bob@host", "10.0.0.9"), candidates, &CancellationToken::new())
        .await;

    assert_eq!(result, AttackResult::Found("pw41".to_string()));
    assert_eq!(classifier.call_count(), 42);
}
