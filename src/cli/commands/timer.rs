//! `forsooth timer` — run one countdown in-process.
//!
//! Demonstration wiring for the timer: a stdout scope, a single demo
//! actor who owns it, and a dispatcher that logs each queued command
//! instead of executing anything.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{CommandError, ExitCode};
use crate::timer::{
    Actor, ActorId, CommandDispatch, ScheduleHandle, Timer, TimerId, TimerScope,
};

struct StdoutScope;

impl TimerScope for StdoutScope {
    fn broadcast(&self, message: &str) {
        println!("{message}");
    }

    fn is_owner(&self, _actor: &ActorId) -> bool {
        true
    }
}

struct DemoActor {
    scope: Arc<dyn TimerScope>,
}

impl Actor for DemoActor {
    fn id(&self) -> ActorId {
        ActorId(0)
    }

    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn active_scope(&self) -> Arc<dyn TimerScope> {
        Arc::clone(&self.scope)
    }
}

struct LogDispatch;

impl CommandDispatch for LogDispatch {
    fn invoke(
        &mut self,
        _caller: &Arc<dyn Actor>,
        command: &str,
        arg: &str,
        _scope: &Arc<dyn TimerScope>,
    ) -> Result<(), CommandError> {
        info!(command, arg, "queued command would run here");
        Ok(())
    }
}

/// Arms, starts, and waits out one timer.
pub async fn run(duration: Duration, id: u8, commands: Vec<String>) -> i32 {
    let Some(id) = TimerId::new(id) else {
        eprintln!("timer id must be between 0 and {}", TimerId::MAX_LOCAL);
        return ExitCode::USAGE_ERROR;
    };

    let scope: Arc<dyn TimerScope> = Arc::new(StdoutScope);
    let actor: Arc<dyn Actor> = Arc::new(DemoActor {
        scope: Arc::clone(&scope),
    });

    let mut timer = Timer::new(id);
    timer.set_scope(scope);
    timer.set_caller(actor);
    for command in commands {
        timer.queue_command(command);
    }

    let token = CancellationToken::new();
    timer.set_schedule(ScheduleHandle::new(token.clone()));
    timer.arm(duration);
    timer.start();
    info!(%id, ?duration, "timer started");

    let mut dispatch = LogDispatch;
    tokio::select! {
        () = tokio::time::sleep(duration) => {
            timer.expire(&mut dispatch);
        }
        _ = tokio::signal::ctrl_c() => {
            timer.cancel();
            info!(%id, remaining = ?timer.remaining(), "timer canceled before expiry");
        }
        () = token.cancelled() => {
            info!(%id, "timer schedule revoked");
        }
    }

    ExitCode::SUCCESS
}
