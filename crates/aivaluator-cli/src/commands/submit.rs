//! The `aivaluator submit` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use aivaluator_client::config::{create_service, load_config_from};
use aivaluator_core::controller::ViewState;
use aivaluator_core::session::load_session;
use aivaluator_render::html::write_view;

pub async fn execute(
    session_path: PathBuf,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    allow_empty: bool,
) -> Result<()> {
    let formats = parse_formats(&format)?;

    let config = load_config_from(config_path.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let session = load_session(&session_path)?;
    let mut controller = session
        .into_controller()?
        .with_required_fields(config.require_all_fields && !allow_empty);

    let service = create_service(&config.server)?;
    info!(endpoint = %config.server.endpoint(), "posting submission");

    let stamp = super::timestamp();
    let outcome = controller.submit_with(service.as_ref()).await.map(|_| ());
    if let Err(e) = outcome {
        let path = super::output_path(&output, "form", &stamp, "html");
        write_view(controller.state(), &path)?;
        eprintln!("Form with error: {}", path.display());
        return Err(e).context("submission failed");
    }

    let ViewState::Result(result) = controller.into_state() else {
        anyhow::bail!("controller did not reach the results view");
    };
    super::print_summary(&result);

    std::fs::create_dir_all(&output)?;
    for fmt in formats {
        match fmt {
            OutputFormat::Html => {
                let path = super::output_path(&output, "results", &stamp, "html");
                write_view(&ViewState::Result(result.clone()), &path)?;
                println!("Results page: {}", path.display());
            }
            OutputFormat::Json => {
                let path = super::output_path(&output, "report", &stamp, "json");
                let json = serde_json::to_string_pretty(&result.report)
                    .context("failed to serialize report")?;
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
                println!("Score report: {}", path.display());
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Json,
}

/// Parse `html`, `json`, `all`, or a comma-separated list.
fn parse_formats(format: &str) -> Result<Vec<OutputFormat>> {
    if format == "all" {
        return Ok(vec![OutputFormat::Html, OutputFormat::Json]);
    }
    format
        .split(',')
        .map(str::trim)
        .map(|fmt| match fmt {
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("unknown format '{other}' (expected html, json, or all)"),
        })
        .collect()
}
