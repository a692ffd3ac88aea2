//! The `aivaluator render` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use aivaluator_core::controller::{ResultState, ViewState};
use aivaluator_core::model::ScoreReport;
use aivaluator_render::html::write_view;

pub fn execute(report_path: PathBuf, questions: Option<usize>, output: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&report_path)
        .with_context(|| format!("failed to read report from {}", report_path.display()))?;
    let report = ScoreReport::from_json(&content).context("failed to parse score report JSON")?;

    let question_count = questions.unwrap_or(report.len());
    let result = ResultState::new(report, question_count);
    super::print_summary(&result);

    let path = super::output_path(&output, "results", &super::timestamp(), "html");
    write_view(&ViewState::Result(result), &path)?;
    println!("Results page: {}", path.display());
    Ok(())
}
