//! The `aivaluator validate` command.

use std::path::PathBuf;

use anyhow::Result;

use aivaluator_core::session::{load_session, validate_session};

pub fn execute(session_path: PathBuf) -> Result<()> {
    let session = load_session(&session_path)?;
    println!(
        "Session: {} students x {} questions ({} values)",
        session.counts.students,
        session.counts.questions,
        session.values.len()
    );

    let warnings = validate_session(&session);
    for w in &warnings {
        let prefix = w
            .field
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Session is complete.");
        Ok(())
    } else {
        anyhow::bail!("{} warning(s) found", warnings.len())
    }
}
