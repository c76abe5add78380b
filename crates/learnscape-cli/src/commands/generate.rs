//! The `learnscape generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use learnscape_core::model::Worksheet;
use learnscape_core::parser::{validate_worksheet, worksheet_to_toml};
use learnscape_core::traits::GenerateQuestionsRequest;
use learnscape_providers::config::load_config_from;
use learnscape_providers::create_generator;

pub async fn execute(
    topic: String,
    class_level: String,
    count: u8,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider_config = config
        .providers
        .get(&config.default_provider)
        .with_context(|| {
            format!(
                "no '{}' provider configured; run `learnscape init` and add an API key",
                config.default_provider
            )
        })?;
    let generator = create_generator(provider_config)?;

    eprintln!("Generating {count} questions about \"{topic}\" for {class_level}...");

    let questions = generator
        .generate(&GenerateQuestionsRequest {
            topic: topic.clone(),
            class_level: class_level.clone(),
            count,
        })
        .await?;

    let worksheet = Worksheet {
        id: slugify(&topic),
        name: format!("LKPD {topic}"),
        class_level,
        description: format!("Dibuat otomatis tentang {topic}"),
        questions,
    };

    for w in validate_worksheet(&worksheet) {
        let prefix = w
            .question
            .map(|n| format!("  [question {n}]"))
            .unwrap_or_else(|| "  ".to_string());
        eprintln!("{prefix} WARNING: {}", w.message);
    }

    let output = output.unwrap_or_else(|| {
        PathBuf::from("worksheets").join(format!("{}.toml", worksheet.id))
    });
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, worksheet_to_toml(&worksheet)?)
        .with_context(|| format!("failed to write worksheet to {}", output.display()))?;

    println!(
        "Worksheet with {} questions written to: {}",
        worksheet.questions.len(),
        output.display()
    );

    Ok(())
}

/// Turn a topic into a filesystem-friendly worksheet id.
fn slugify(topic: &str) -> String {
    let slug: String = topic
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    let mut collapsed = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }
    if collapsed.is_empty() {
        "worksheet".to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_topics() {
        assert_eq!(slugify("Aljabar Linear"), "aljabar-linear");
        assert_eq!(slugify("  Sel & Jaringan!  "), "sel-jaringan");
        assert_eq!(slugify("***"), "worksheet");
    }
}
