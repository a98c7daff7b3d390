//! Scoped countdown timers and their command executor.
//!
//! A [`Timer`] is a countdown bound to a broadcast scope. When it
//! expires it announces the expiry to the scope and drains its queued
//! commands through an external [`CommandDispatch`] in FIFO order. The
//! async schedule that actually fires the expiry lives outside this
//! module; a timer only holds a [`ScheduleHandle`] so it can revoke a
//! pending schedule on cancel or expiry.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::CommandError;

/// Queued command arguments are clipped to this many characters.
const MAX_COMMAND_ARG_LEN: usize = 1024;

/// Default display format for timer faces.
const DEFAULT_DISPLAY_FORMAT: &str = "hh:mm:ss.zzz";

/// Default client-side tick interval in milliseconds.
const DEFAULT_TICK_INTERVAL_MS: u32 = 16;

/// Identifier of a timer.
///
/// Id 0 is the server-global timer; ids 1 through 20 are scope-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u8);

impl TimerId {
    /// The server-global timer.
    pub const GLOBAL: Self = Self(0);

    /// Highest scope-local timer id.
    pub const MAX_LOCAL: u8 = 20;

    /// Builds a timer id, rejecting values outside `0..=20`.
    #[must_use]
    pub fn new(raw: u8) -> Option<Self> {
        (raw <= Self::MAX_LOCAL).then_some(Self(raw))
    }

    /// Whether this is the server-global timer.
    #[must_use]
    pub const fn is_global(self) -> bool {
        self.0 == 0
    }

    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the actor that configured a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

/// Broadcast scope a timer is bound to (an area, or the whole server).
pub trait TimerScope {
    /// Sends a message to everyone in the scope.
    fn broadcast(&self, message: &str);

    /// Whether the given actor currently holds owner rights here.
    fn is_owner(&self, actor: &ActorId) -> bool;
}

/// The actor that armed the timer and queued its commands.
pub trait Actor {
    /// Stable identifier.
    fn id(&self) -> ActorId;

    /// Sends a message to this actor only.
    fn notify(&self, message: &str);

    /// The scope the actor is currently in. The global timer executes
    /// its commands against this, not against its owning scope.
    fn active_scope(&self) -> Arc<dyn TimerScope>;
}

/// External command dispatcher the executor drains into.
pub trait CommandDispatch {
    /// Runs one named command with its argument inside `scope` on
    /// behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Domain failures are reported to the caller verbatim and stop the
    /// queue; [`CommandError::Internal`] is reported with a generic
    /// message instead.
    fn invoke(
        &mut self,
        caller: &Arc<dyn Actor>,
        command: &str,
        arg: &str,
        scope: &Arc<dyn TimerScope>,
    ) -> Result<(), CommandError>;
}

/// Revocation handle for a pending async schedule.
#[derive(Debug, Clone, Default)]
pub struct ScheduleHandle {
    token: CancellationToken,
}

impl ScheduleHandle {
    /// Wraps an existing cancellation token.
    #[must_use]
    pub const fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Revokes the schedule.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the schedule has been revoked.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A countdown timer bound to a broadcast scope.
pub struct Timer {
    id: TimerId,
    armed: bool,
    started: bool,
    remaining: Option<Duration>,
    deadline: Option<Instant>,
    scope: Option<Arc<dyn TimerScope>>,
    caller: Option<Arc<dyn Actor>>,
    schedule: Option<ScheduleHandle>,
    commands: VecDeque<String>,
    display_format: String,
    tick_interval_ms: u32,
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("armed", &self.armed)
            .field("started", &self.started)
            .field("remaining", &self.remaining)
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

impl Timer {
    /// Creates an inert timer with default display settings.
    #[must_use]
    pub fn new(id: TimerId) -> Self {
        Self {
            id,
            armed: false,
            started: false,
            remaining: None,
            deadline: None,
            scope: None,
            caller: None,
            schedule: None,
            commands: VecDeque::new(),
            display_format: DEFAULT_DISPLAY_FORMAT.to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }

    /// Timer identifier.
    #[must_use]
    pub const fn id(&self) -> TimerId {
        self.id
    }

    /// Binds the broadcast scope.
    pub fn set_scope(&mut self, scope: Arc<dyn TimerScope>) {
        self.scope = Some(scope);
    }

    /// Records the actor on whose behalf queued commands run.
    pub fn set_caller(&mut self, caller: Arc<dyn Actor>) {
        self.caller = Some(caller);
    }

    /// Installs the revocation handle for the pending schedule,
    /// revoking any previous one.
    pub fn set_schedule(&mut self, schedule: ScheduleHandle) {
        if let Some(old) = self.schedule.replace(schedule) {
            old.cancel();
        }
    }

    /// Whether a schedule handle is currently installed.
    #[must_use]
    pub const fn has_schedule(&self) -> bool {
        self.schedule.is_some()
    }

    /// Appends a command to the expiry queue.
    pub fn queue_command(&mut self, command: impl Into<String>) {
        self.commands.push_back(command.into());
    }

    /// Commands still waiting to run.
    #[must_use]
    pub fn commands(&self) -> &VecDeque<String> {
        &self.commands
    }

    /// Display format string for timer faces.
    #[must_use]
    pub fn display_format(&self) -> &str {
        &self.display_format
    }

    /// Client-side tick interval in milliseconds.
    #[must_use]
    pub const fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    /// Whether the timer has a duration loaded.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the countdown is running.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Time left on the countdown. While running this is computed from
    /// the deadline; while paused it is the stored residue.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        if self.started {
            self.deadline
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
        } else {
            self.remaining
        }
    }

    /// Loads a duration without starting the countdown.
    pub fn arm(&mut self, duration: Duration) {
        self.armed = true;
        self.started = false;
        self.remaining = Some(duration);
        self.deadline = None;
    }

    /// Starts the countdown. Returns false when nothing is armed.
    pub fn start(&mut self) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        if !self.armed {
            return false;
        }
        self.deadline = Some(Instant::now() + remaining);
        self.started = true;
        true
    }

    /// Pauses the countdown, keeping the residue for a later start.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.remaining = self
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()));
        self.deadline = None;
        self.started = false;
    }

    /// Cancels the timer: revokes the schedule and stops the countdown.
    /// The stored residue is kept, the queue is untouched, and nothing
    /// is broadcast.
    pub fn cancel(&mut self) {
        if let Some(schedule) = self.schedule.take() {
            schedule.cancel();
        }
        self.started = false;
        self.deadline = None;
    }

    /// Fires the expiry: revokes the schedule, announces the expiry to
    /// the scope, and drains the command queue.
    ///
    /// Without a bound scope this only revokes the schedule.
    pub fn expire(&mut self, dispatch: &mut dyn CommandDispatch) {
        if let Some(schedule) = self.schedule.take() {
            schedule.cancel();
        }
        let Some(scope) = self.scope.clone() else {
            return;
        };

        self.remaining = Some(Duration::ZERO);
        self.deadline = None;
        self.started = false;

        scope.broadcast(&format!("Timer {} has expired.", self.id));
        self.call_commands(dispatch);
    }

    /// Drains the command queue through the dispatcher in FIFO order.
    ///
    /// Requires a bound caller and scope, and the caller must hold
    /// owner rights in the scope. Scope-local timers execute against
    /// their owning scope; the global timer executes against the
    /// caller's currently active scope. The first failed command stops
    /// the drain, notifies the caller, and clears the rest of the
    /// queue.
    pub fn call_commands(&mut self, dispatch: &mut dyn CommandDispatch) {
        let Some(caller) = self.caller.clone() else {
            return;
        };
        let Some(scope) = self.scope.clone() else {
            return;
        };
        if !scope.is_owner(&caller.id()) {
            return;
        }

        while let Some(entry) = self.commands.pop_front() {
            let (name, arg) = split_command(&entry);
            let exec_scope = if self.id.is_global() {
                caller.active_scope()
            } else {
                Arc::clone(&scope)
            };

            if let Err(err) = dispatch.invoke(&caller, &name, &arg, &exec_scope) {
                if err.is_internal() {
                    caller.notify(&format!(
                        "[Timer {}] An internal error occurred: {err}. \
                         Please inform the staff of the server about the issue.",
                        self.id
                    ));
                    error!(timer = %self.id, %err, "queued timer command failed");
                } else {
                    caller.notify(&format!("[Timer {}] {err}", self.id));
                }
                self.commands.clear();
                return;
            }
        }
    }
}

/// Splits a queued entry into a lowercased command name and its
/// argument tail, clipping the argument.
fn split_command(entry: &str) -> (String, String) {
    let trimmed = entry.trim_start();
    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(name, rest)| (name, rest.trim_start()));
    (
        name.to_lowercase(),
        rest.chars().take(MAX_COMMAND_ARG_LEN).collect(),
    )
}
