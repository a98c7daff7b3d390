//! `forsooth speak` — rewrite stdin lines.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, warn};

use crate::error::ExitCode;
use crate::rules::RuleSet;
use crate::speech::SpeechEngine;

/// Streams stdin through the speech engine, one line at a time.
pub fn run(rules_path: &Path, seed: Option<u64>) -> i32 {
    let rules = Arc::new(RuleSet::load(rules_path));
    if !rules.is_valid() {
        warn!(path = %rules_path.display(), "invalid rule document, passing text through");
    }

    let mut engine = match seed {
        Some(seed) => SpeechEngine::with_seed(Arc::clone(&rules), seed),
        None => SpeechEngine::new(Arc::clone(&rules)),
    };

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => println!("{}", engine.transform(&line)),
            Err(e) => {
                error!(error = %e, "unable to read stdin");
                return ExitCode::IO_ERROR;
            }
        }
    }
    ExitCode::SUCCESS
}
