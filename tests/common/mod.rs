//! Shared fixtures for integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use forsooth::error::CommandError;
use forsooth::timer::{Actor, ActorId, CommandDispatch, TimerScope};

/// Path to the demo rule document shipped with the crate.
#[must_use]
pub fn demo_rules_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/rules.json")
}

/// A scope that records every broadcast.
#[derive(Default)]
pub struct MockScope {
    broadcasts: Mutex<Vec<String>>,
    owners: Mutex<HashSet<u64>>,
}

impl MockScope {
    #[must_use]
    pub fn with_owner(actor: ActorId) -> Arc<Self> {
        let scope = Self::default();
        scope.owners.lock().unwrap().insert(actor.0);
        Arc::new(scope)
    }

    #[must_use]
    pub fn broadcasts(&self) -> Vec<String> {
        self.broadcasts.lock().unwrap().clone()
    }
}

impl TimerScope for MockScope {
    fn broadcast(&self, message: &str) {
        self.broadcasts.lock().unwrap().push(message.to_string());
    }

    fn is_owner(&self, actor: &ActorId) -> bool {
        self.owners.lock().unwrap().contains(&actor.0)
    }
}

/// An actor that records every private notice.
pub struct MockActor {
    id: ActorId,
    notices: Mutex<Vec<String>>,
    active: Arc<dyn TimerScope>,
}

impl MockActor {
    #[must_use]
    pub fn new(id: u64, active: Arc<dyn TimerScope>) -> Arc<Self> {
        Arc::new(Self {
            id: ActorId(id),
            notices: Mutex::new(Vec::new()),
            active,
        })
    }

    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Actor for MockActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn active_scope(&self) -> Arc<dyn TimerScope> {
        Arc::clone(&self.active)
    }
}

/// A dispatcher that records calls and fails on request.
#[derive(Default)]
pub struct MockDispatch {
    pub calls: Vec<(String, String)>,
    pub failures: std::collections::VecDeque<CommandError>,
}

impl CommandDispatch for MockDispatch {
    fn invoke(
        &mut self,
        _caller: &Arc<dyn Actor>,
        command: &str,
        arg: &str,
        _scope: &Arc<dyn TimerScope>,
    ) -> Result<(), CommandError> {
        self.calls.push((command.to_string(), arg.to_string()));
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
