//! The `learnscape init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create learnscape.toml
    if std::path::Path::new("learnscape.toml").exists() {
        println!("learnscape.toml already exists, skipping.");
    } else {
        std::fs::write("learnscape.toml", SAMPLE_CONFIG)?;
        println!("Created learnscape.toml");
    }

    // Create example worksheet
    std::fs::create_dir_all("worksheets")?;
    let example_path = std::path::Path::new("worksheets/contoh.toml");
    if example_path.exists() {
        println!("worksheets/contoh.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_WORKSHEET)?;
        println!("Created worksheets/contoh.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit learnscape.toml with your API key");
    println!("  2. Run: learnscape validate --worksheet worksheets/contoh.toml");
    println!("  3. Run: learnscape grade --worksheet worksheets/contoh.toml --answers answers.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# learnscape configuration

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"
model = "gemini-2.0-flash"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

default_provider = "gemini"
output_dir = "./submissions"
"#;

const EXAMPLE_WORKSHEET: &str = r#"[worksheet]
id = "contoh"
name = "LKPD Contoh"
class_level = "Kelas 7"
description = "Contoh lembar kerja untuk memulai"

[[questions]]
text = "Siapa penemu gaya gravitasi?"
type = "multiple-choice"
options = ["Isaac Newton", "Albert Einstein", "Galileo Galilei", "Nikola Tesla"]
correct_answer = "0"

[[questions]]
text = "Berapakah hasil dari 15 x 3?"
type = "numeric"
correct_answer = "45"

[[questions]]
text = "Sebutkan dua faktor dari 32 yang hasil kalinya 32 (selain 1 dan 32)"
type = "short-answer"
correct_answer = "4 dan 8"
"#;
