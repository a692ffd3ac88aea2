//! The `aivaluator init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing("aivaluator.toml", SAMPLE_CONFIG)?;
    write_if_missing("session.toml", EXAMPLE_SESSION)?;

    println!("\nNext steps:");
    println!("  1. Point [server] base_url in aivaluator.toml at your grading service");
    println!("  2. Run: aivaluator validate --session session.toml");
    println!("  3. Run: aivaluator submit --session session.toml");

    Ok(())
}

fn write_if_missing(path: &str, content: &str) -> Result<()> {
    if std::path::Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# aivaluator configuration

output_dir = "./aivaluator-results"
require_all_fields = true

[server]
base_url = "http://127.0.0.1:5000"
submit_path = "/submit"
timeout_secs = 30
"#;

const EXAMPLE_SESSION: &str = r#"# Field ids match the generated form: student{i}, question{i},
# gptAnswer{i}, textbookAnswer{i}, answer{question}_{student}.
students = 2
questions = 1

[values]
student0 = "Alice"
student1 = "Bob"
question0 = "What is photosynthesis?"
gptAnswer0 = """
Photosynthesis is the process by which green plants use sunlight, water and
carbon dioxide to produce glucose and oxygen.
"""
textbookAnswer0 = """
The process by which plants convert light energy into chemical energy stored
in glucose, releasing oxygen as a by-product.
"""
answer0_0 = "Plants use sunlight to turn water and carbon dioxide into sugar and oxygen."
answer0_1 = "It is how plants make food from light."
"#;
