//! End-to-end timer behavior through the public API.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use common::{MockActor, MockDispatch, MockScope};
use forsooth::error::CommandError;
use forsooth::timer::{Actor, ActorId, ScheduleHandle, Timer, TimerId, TimerScope};

fn owned_timer(id: u8) -> (Timer, Arc<MockScope>, Arc<MockActor>) {
    let scope = MockScope::with_owner(ActorId(11));
    let actor = MockActor::new(11, Arc::clone(&scope) as Arc<dyn TimerScope>);
    let mut timer = Timer::new(TimerId::new(id).unwrap());
    timer.set_scope(Arc::clone(&scope) as Arc<dyn TimerScope>);
    timer.set_caller(Arc::clone(&actor) as Arc<dyn Actor>);
    (timer, scope, actor)
}

#[test]
fn expiry_announces_then_drains_the_queue() {
    let (mut timer, scope, _) = owned_timer(5);
    timer.arm(Duration::from_secs(1));
    timer.start();
    timer.queue_command("play waltz.opus");
    timer.queue_command("announce court is back in session");

    let mut dispatch = MockDispatch::default();
    timer.expire(&mut dispatch);

    assert_eq!(scope.broadcasts(), ["Timer 5 has expired."]);
    assert_eq!(
        dispatch.calls,
        [
            ("play".to_string(), "waltz.opus".to_string()),
            ("announce".to_string(), "court is back in session".to_string()),
        ]
    );
    assert!(timer.commands().is_empty());
    assert!(!timer.is_started());
    assert_eq!(timer.remaining(), Some(Duration::ZERO));
}

#[test]
fn failed_command_notifies_and_abandons_the_rest() {
    let (mut timer, scope, actor) = owned_timer(2);
    timer.queue_command("play missing.opus");
    timer.queue_command("announce never runs");

    let mut dispatch = MockDispatch::default();
    dispatch
        .failures
        .push_back(CommandError::Area("This area has no music list.".to_string()));
    timer.expire(&mut dispatch);

    assert_eq!(scope.broadcasts(), ["Timer 2 has expired."]);
    assert_eq!(dispatch.calls.len(), 1);
    assert_eq!(actor.notices(), ["[Timer 2] This area has no music list."]);
    assert!(timer.commands().is_empty());
}

#[test]
fn internal_failure_reports_generically() {
    let (mut timer, _, actor) = owned_timer(2);
    timer.queue_command("play waltz.opus");

    let mut dispatch = MockDispatch::default();
    dispatch
        .failures
        .push_back(CommandError::Internal("slice index out of range".to_string()));
    timer.call_commands(&mut dispatch);

    let notices = actor.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("An internal error occurred"));
    assert!(notices[0].contains("slice index out of range"));
}

#[test]
fn expiry_revokes_a_pending_schedule() {
    let (mut timer, _, _) = owned_timer(1);
    let token = CancellationToken::new();
    timer.set_schedule(ScheduleHandle::new(token.clone()));

    let mut dispatch = MockDispatch::default();
    timer.expire(&mut dispatch);

    assert!(token.is_cancelled());
    assert!(!timer.has_schedule());
}

#[test]
fn cancel_before_expiry_is_silent() {
    let (mut timer, scope, actor) = owned_timer(1);
    timer.arm(Duration::from_secs(300));
    timer.start();
    let token = CancellationToken::new();
    timer.set_schedule(ScheduleHandle::new(token.clone()));

    timer.cancel();

    assert!(token.is_cancelled());
    assert!(scope.broadcasts().is_empty());
    assert!(actor.notices().is_empty());
    assert!(!timer.is_started());
}

#[tokio::test]
async fn scheduled_expiry_fires_after_the_sleep() {
    let (mut timer, scope, _) = owned_timer(1);
    let duration = Duration::from_millis(10);
    timer.arm(duration);
    timer.start();
    timer.queue_command("play waltz.opus");

    let token = CancellationToken::new();
    timer.set_schedule(ScheduleHandle::new(token.clone()));

    let mut dispatch = MockDispatch::default();
    tokio::select! {
        () = tokio::time::sleep(duration) => timer.expire(&mut dispatch),
        () = token.cancelled() => {}
    }

    assert_eq!(scope.broadcasts(), ["Timer 1 has expired."]);
    assert_eq!(dispatch.calls.len(), 1);
}

#[tokio::test]
async fn revoked_schedule_never_expires() {
    let (mut timer, scope, _) = owned_timer(1);
    timer.arm(Duration::from_millis(10));
    timer.start();

    let token = CancellationToken::new();
    timer.set_schedule(ScheduleHandle::new(token.clone()));
    timer.cancel();

    let mut dispatch = MockDispatch::default();
    tokio::select! {
        () = tokio::time::sleep(Duration::from_millis(10)) => {
            // The schedule task would observe cancellation first.
            if !token.is_cancelled() {
                timer.expire(&mut dispatch);
            }
        }
        () = token.cancelled() => {}
    }

    assert!(scope.broadcasts().is_empty());
    assert!(dispatch.calls.is_empty());
}
