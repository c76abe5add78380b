//! The `learnscape validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(worksheet_path: PathBuf) -> Result<()> {
    let sheets = if worksheet_path.is_dir() {
        learnscape_core::parser::load_worksheet_directory(&worksheet_path)?
    } else {
        vec![learnscape_core::parser::parse_worksheet(&worksheet_path)?]
    };

    let mut total_warnings = 0;

    for sheet in &sheets {
        println!("Worksheet: {} ({} questions)", sheet.name, sheet.questions.len());

        let warnings = learnscape_core::parser::validate_worksheet(sheet);
        for w in &warnings {
            let prefix = w
                .question
                .map(|n| format!("  [question {n}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All worksheets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
