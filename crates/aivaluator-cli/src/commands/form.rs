//! The `aivaluator form` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use aivaluator_core::controller::Controller;
use aivaluator_core::session::Session;
use aivaluator_render::html::write_view;

pub fn execute(
    students: &str,
    questions: &str,
    output: PathBuf,
    session_out: Option<PathBuf>,
) -> Result<()> {
    let mut controller = Controller::initialize();
    let layout = controller.expand_from_input(students, questions)?;
    let counts = layout.counts;
    let field_count = layout.field_count();

    let path = output.join("form.html");
    write_view(controller.state(), &path)?;
    println!(
        "Form for {} students x {} questions ({} fields): {}",
        counts.students,
        counts.questions,
        field_count,
        path.display()
    );

    if let Some(session_path) = session_out {
        if session_path.exists() {
            println!("{} already exists, skipping.", session_path.display());
        } else {
            if let Some(parent) = session_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let text = Session::skeleton(counts).to_toml_string()?;
            std::fs::write(&session_path, text)
                .with_context(|| format!("failed to write {}", session_path.display()))?;
            println!("Session skeleton: {}", session_path.display());
        }
    }

    Ok(())
}
