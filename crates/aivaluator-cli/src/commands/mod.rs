pub mod form;
pub mod init;
pub mod render;
pub mod submit;
pub mod validate;

use std::path::{Path, PathBuf};

use aivaluator_core::controller::ResultState;
use aivaluator_render::html::format_average;

/// Timestamp used in output file names, with millisecond precision.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H%M%S%.3f").to_string()
}

/// `{dir}/{prefix}-{stamp}.{ext}`, with a `-N` suffix when that file exists.
pub(crate) fn output_path(dir: &Path, prefix: &str, stamp: &str, ext: &str) -> PathBuf {
    let mut path = dir.join(format!("{prefix}-{stamp}.{ext}"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{prefix}-{stamp}-{n}.{ext}"));
        n += 1;
    }
    path
}

/// Print per-question marks and combined averages as tables on stderr.
pub(crate) fn print_summary(result: &ResultState) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Student", "GPT", "TextBook"]);
    for (question, scores) in result.report.questions() {
        for (student, marks) in scores {
            table.add_row(vec![
                Cell::new(question),
                Cell::new(student),
                Cell::new(marks.gpt),
                Cell::new(marks.textbook),
            ]);
        }
    }
    eprintln!("\n{table}");

    match result.averages() {
        Some(averages) => {
            let mut combined = Table::new();
            combined.set_header(vec!["Student", "Avg GPT", "Avg TextBook"]);
            for avg in &averages {
                combined.add_row(vec![
                    Cell::new(&avg.student),
                    Cell::new(format_average(avg.gpt)),
                    Cell::new(format_average(avg.textbook)),
                ]);
            }
            eprintln!("\nCombined Grades\n{combined}");
        }
        None => eprintln!("\nCombined Grades: no questions were graded."),
    }
}
