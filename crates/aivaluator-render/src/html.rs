//! HTML page renderer.
//!
//! Produces a self-contained HTML page with CSS inlined for whichever view
//! the controller is in. All user-supplied text is escaped.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use aivaluator_core::controller::{FormState, ResultState, ViewState};
use aivaluator_core::form::{Field, FieldKind, FieldValues};

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Format a per-question mark the way the scoring service sent it
/// (`8`, `62.5`, `66.66666666666667`).
pub fn format_mark(mark: f64) -> String {
    mark.to_string()
}

/// Format an averaged mark with two decimals, rounding exact ties away
/// from zero (`12.625` becomes `12.63`).
///
/// `{:.2}` alone rounds exact ties to even. A value sits exactly on a
/// two-decimal tie only when it is an odd number of eighths, and then
/// `value * 100.0` is exact.
pub fn format_average(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{value:.2}")
}

/// Render a complete HTML document for the current view.
pub fn render_view(state: &ViewState) -> String {
    let (title, body) = match state {
        ViewState::Form(form) => ("AIValuator", render_form(form)),
        ViewState::Result(result) => ("AIValuator: Graded Results", render_results(result)),
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n<div id=\"app\">\n");
    html.push_str(&body);
    html.push_str("</div>\n</body>\n</html>");
    html
}

/// Render the form view: count inputs, generated fields, and submit control.
pub fn render_form(form: &FormState) -> String {
    let mut html = String::new();
    let counts = form.counts();

    html.push_str("<h1>Welcome to AIValuator</h1>\n");

    if let Some(error) = &form.error {
        let _ = writeln!(
            html,
            "<div class=\"error\" role=\"alert\"><span>{}</span><button type=\"button\" class=\"dismiss\" aria-label=\"Dismiss\">&times;</button></div>",
            html_escape(error)
        );
    }

    let count_value = |n: Option<usize>| n.map(|n| format!(" value=\"{n}\"")).unwrap_or_default();
    let _ = writeln!(
        html,
        "<div class=\"form-group\">\n<label for=\"numStudents\">Enter Number of Students:</label>\n<input type=\"number\" id=\"numStudents\" min=\"0\"{} required>\n</div>",
        count_value(counts.map(|c| c.students))
    );
    let _ = writeln!(
        html,
        "<div class=\"form-group\">\n<label for=\"numQuestions\">Enter Number of Questions:</label>\n<input type=\"number\" id=\"numQuestions\" min=\"0\"{} required>\n</div>",
        count_value(counts.map(|c| c.questions))
    );
    html.push_str(
        "<div class=\"form-group\">\n<button id=\"startButton\" type=\"button\">Start</button>\n</div>\n",
    );

    html.push_str("<div id=\"studentInputs\">\n");
    if let Some(layout) = &form.layout {
        for field in &layout.students {
            push_field(&mut html, field, &form.values);
        }
    }
    html.push_str("</div>\n");

    html.push_str("<div id=\"questions\">\n");
    if let Some(layout) = &form.layout {
        for block in &layout.questions {
            html.push_str("<div class=\"question-block\">\n");
            push_field(&mut html, &block.question, &form.values);
            push_field(&mut html, &block.gpt_answer, &form.values);
            push_field(&mut html, &block.textbook_answer, &form.values);
            for answer in &block.answers {
                push_field(&mut html, answer, &form.values);
            }
            html.push_str("</div>\n");
        }

        if form.is_submitting() {
            html.push_str("<div class=\"form-group\">\n<button id=\"submitButton\" type=\"button\" disabled>Submitting&hellip;</button>\n</div>\n");
        } else {
            html.push_str("<div class=\"form-group\">\n<button id=\"submitButton\" type=\"button\">Submit</button>\n</div>\n");
        }
    }
    html.push_str("</div>\n");

    html
}

fn push_field(html: &mut String, field: &Field, values: &FieldValues) {
    let id = field.id.to_string();
    let value = html_escape(values.get(field.id).unwrap_or_default());
    html.push_str("<div class=\"form-group\">\n");
    let _ = writeln!(
        html,
        "<label for=\"{id}\">{}</label>",
        html_escape(&field.label)
    );
    match field.kind {
        FieldKind::Text => {
            let _ = writeln!(
                html,
                "<input type=\"text\" id=\"{id}\" name=\"{id}\" value=\"{value}\" required>"
            );
        }
        FieldKind::TextArea => {
            let _ = writeln!(
                html,
                "<textarea id=\"{id}\" name=\"{id}\" rows=\"4\" required>{value}</textarea>"
            );
        }
    }
    html.push_str("</div>\n");
}

/// Render the results view: one block per question, then combined grades.
pub fn render_results(result: &ResultState) -> String {
    let mut html = String::new();

    html.push_str("<h1>Graded Results</h1>\n");
    html.push_str("<div class=\"result\">\n");

    for (question, scores) in result.report.questions() {
        html.push_str("<div class=\"question-result\">\n");
        let _ = writeln!(html, "<h2>{}</h2>", html_escape(question));
        html.push_str("<ul class=\"scores\">\n");
        for (student, marks) in scores {
            push_student_marks(
                &mut html,
                student,
                &format_mark(marks.gpt),
                &format_mark(marks.textbook),
            );
        }
        html.push_str("</ul>\n</div>\n");
    }

    html.push_str("<div class=\"combined\">\n<h2>Combined Grades</h2>\n");
    match result.averages() {
        Some(averages) => {
            html.push_str("<ul class=\"scores\">\n");
            for avg in &averages {
                push_student_marks(
                    &mut html,
                    &avg.student,
                    &format_average(avg.gpt),
                    &format_average(avg.textbook),
                );
            }
            html.push_str("</ul>\n");
        }
        None => html.push_str("<p class=\"note\">No questions were graded.</p>\n"),
    }
    html.push_str("</div>\n");

    html.push_str("<details class=\"raw-data\">\n<summary>Raw JSON Data</summary>\n<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(&result.report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n</details>\n");

    html.push_str("</div>\n");

    html
}

fn push_student_marks(html: &mut String, student: &str, gpt: &str, textbook: &str) {
    let _ = writeln!(
        html,
        "<li>{}:\n<ul>\n<li>GPT Marks: {gpt}</li>\n<li>TextBook Marks: {textbook}</li>\n</ul>\n</li>",
        html_escape(student)
    );
}

/// Write a rendered page to a file, creating parent directories.
pub fn write_html(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Render the view and write it to a file.
pub fn write_view(state: &ViewState, path: &Path) -> Result<()> {
    write_html(&render_view(state), path)
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --accent: #2563eb; --error: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --accent: #60a5fa; --error: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
#app { max-width: 48rem; margin: 0 auto; }
h1, h2 { margin-top: 2rem; }
.form-group { display: flex; flex-direction: column; margin: 1rem 0; }
label { font-weight: 600; margin-bottom: 0.25rem; }
input, textarea { padding: 0.5rem; border: 1px solid var(--border); border-radius: 6px; background: var(--bg); color: var(--fg); }
button { align-self: flex-start; padding: 0.5rem 1.25rem; border: 0; border-radius: 6px; background: var(--accent); color: #fff; cursor: pointer; }
button:disabled { opacity: 0.6; cursor: progress; }
.question-block { border-top: 1px solid var(--border); margin-top: 1.5rem; }
.error { display: flex; justify-content: space-between; align-items: center; padding: 0.75rem 1rem; border-radius: 6px; background: var(--error); }
.error .dismiss { background: transparent; color: inherit; padding: 0 0.5rem; }
.scores { list-style: none; padding-left: 0; }
.scores > li { margin: 0.5rem 0; }
.note { color: #6b7280; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 2rem 0 1rem; }
summary { cursor: pointer; font-weight: bold; }
"#;
