//! Every suspended event is resumed exactly once, whatever happens to it.

mod common;

use std::collections::HashSet;
use std::time::Duration;

use aebridge_events::{
    BridgeOptions, CallbackStatus, DROPPED_REPLY_MESSAGE, EventBridge, OsStatus, ReplyValue,
};
use aebridge_test::{
    MockEventManager, MockReply, get_url_event, open_location_event, setup_test_logging,
};
use common::{Harness, direct_value, error_string};

#[test]
fn completed_once() {
    let mut h = Harness::new(4);
    assert_eq!(h.request(&open_location_event("a")), CallbackStatus::ReplyLater);

    let (_, completer) = h.queue.try_recv().unwrap().into_parts();
    assert!(completer.unwrap().reply("done"));

    let resumes = h.resumes();
    assert_eq!(resumes.len(), 1);
    assert_eq!(direct_value(&resumes[0]), Some(ReplyValue::Text("done".to_owned())));
    assert_eq!(h.manager().resume_attempts(), 1);
}

#[test]
fn dropped_on_another_thread() {
    let mut h = Harness::new(4);
    h.request(&open_location_event("a"));
    let dispatch = h.queue.try_recv().unwrap();

    std::thread::spawn(move || drop(dispatch)).join().unwrap();

    let resumes = h.resumes();
    assert_eq!(resumes.len(), 1);
    assert_eq!(resumes[0].status, OsStatus::EVENT_FAILED);
    assert_eq!(error_string(&resumes[0]).as_deref(), Some(DROPPED_REPLY_MESSAGE));
}

#[test]
fn panicking_consumer_still_releases() {
    let mut h = Harness::new(4);
    h.request(&open_location_event("a"));
    let dispatch = h.queue.try_recv().unwrap();

    let joined = std::thread::spawn(move || {
        let _held = dispatch;
        panic!("consumer crashed");
    })
    .join();
    assert!(joined.is_err());

    assert_eq!(h.manager().resume_attempts(), 1);
    assert_eq!(
        error_string(&h.resumes()[0]).as_deref(),
        Some(DROPPED_REPLY_MESSAGE)
    );
}

#[test]
fn failed_resume_is_not_retried() {
    let mut h = Harness::new(4);
    h.request(&open_location_event("a"));
    h.manager().fail_resume(OsStatus(-1));

    let (_, completer) = h.queue.try_recv().unwrap().into_parts();
    assert!(completer.unwrap().finish());

    assert_eq!(h.manager().resume_attempts(), 1);
    assert!(h.resumes().is_empty());
}

#[test]
fn full_queue_answers_overflow_and_keeps_first() {
    let mut h = Harness::new(1);
    assert_eq!(h.request(&open_location_event("first")), CallbackStatus::ReplyLater);
    assert_eq!(h.request(&open_location_event("second")), CallbackStatus::ReplyLater);

    let resumes = h.resumes();
    assert_eq!(resumes.len(), 1);
    assert_eq!(
        error_string(&resumes[0]).as_deref(),
        Some("event could not be dispatched: dispatch queue is full")
    );

    let (record, completer) = h.queue.try_recv().unwrap().into_parts();
    assert_eq!(record.direct_parameter().and_then(|v| v.as_str()), Some("first"));
    completer.unwrap().finish();
    assert_eq!(h.manager().resume_attempts(), 2);
}

#[test]
fn immediate_failures_never_suspend() {
    let bridge = EventBridge::new(MockEventManager::new());
    assert_eq!(
        bridge.handle_event(&open_location_event("a"), Some(MockReply::new())),
        CallbackStatus::Failed(OsStatus::EVENT_NOT_HANDLED)
    );

    let h = Harness::new(4);
    h.manager().fail_suspend(OsStatus(-1));
    assert_eq!(
        h.request(&open_location_event("a")),
        CallbackStatus::Failed(OsStatus::EVENT_FAILED)
    );

    assert!(bridge.manager().suspends().is_empty());
    assert!(h.manager().suspends().is_empty());
    assert_eq!(h.manager().resume_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_wins_then_late_completion_is_ignored() {
    setup_test_logging("aebridge_events=debug");
    let mut h = Harness::with_options(
        4,
        BridgeOptions {
            reply_timeout: Some(Duration::from_secs(5)),
            ..BridgeOptions::default()
        },
    );
    h.request(&get_url_event("com.apple.Safari"));

    tokio::time::advance(Duration::from_secs(6)).await;
    h.manager().wait_for_resumes(1).await;

    let (_, completer) = h.queue.try_recv().unwrap().into_parts();
    assert!(!completer.unwrap().reply("too late"));

    let resumes = h.resumes();
    assert_eq!(resumes.len(), 1);
    assert_eq!(
        error_string(&resumes[0]).as_deref(),
        Some("handler timed out after 5s")
    );
}

#[tokio::test(start_paused = true)]
async fn completion_before_timeout_disarms_it() {
    let mut h = Harness::with_options(
        4,
        BridgeOptions {
            reply_timeout: Some(Duration::from_secs(5)),
            ..BridgeOptions::default()
        },
    );
    h.request(&get_url_event("com.apple.Safari"));
    let (_, completer) = h.queue.try_recv().unwrap().into_parts();
    assert!(completer.unwrap().reply("quick"));

    tokio::time::advance(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;

    assert_eq!(h.manager().resume_attempts(), 1);
    assert_eq!(
        direct_value(&h.resumes()[0]),
        Some(ReplyValue::Text("quick".to_owned()))
    );
}

#[test]
fn concurrent_events_each_resume_once() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 25;

    let mut h = Harness::new(THREADS.saturating_mul(PER_THREAD));
    std::thread::scope(|scope| {
        for t in 0..THREADS {
            let bridge = &h.bridge;
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    let event = open_location_event(&format!("{t}-{i}"));
                    assert_eq!(
                        bridge.handle_event(&event, Some(MockReply::new())),
                        CallbackStatus::ReplyLater
                    );
                }
            });
        }
    });

    let mut seen = HashSet::new();
    while let Ok(dispatch) = h.queue.try_recv() {
        let (record, completer) = dispatch.into_parts();
        let url = record.direct_parameter().and_then(|v| v.as_str()).unwrap().to_owned();
        assert!(seen.insert(url.clone()));
        completer.unwrap().reply(url);
    }

    let total = THREADS.saturating_mul(PER_THREAD);
    assert_eq!(seen.len(), total);
    let resumes = h.resumes();
    assert_eq!(resumes.len(), total);
    let tokens: HashSet<_> = resumes.iter().map(|r| r.token).collect();
    assert_eq!(tokens.len(), total);
    assert_eq!(h.manager().suspends().len(), total);
}
