//! The `learnify init` command.

use std::path::Path;

use anyhow::{Context, Result};

const CONFIG_TEMPLATE: &str = r#"# learnify configuration

# Gemini API key. ${VAR} references are resolved from the environment,
# and LEARNIFY_API_KEY overrides this value entirely.
api_key = "${GEMINI_API_KEY}"

# Generation model.
model = "gemini-2.5-flash"

# Where the learner roster and progress live.
store_path = "./learnify-data.json"
"#;

pub fn execute() -> Result<()> {
    let path = Path::new("learnify.toml");
    if path.exists() {
        println!("learnify.toml already exists, skipping");
    } else {
        std::fs::write(path, CONFIG_TEMPLATE).context("failed to write learnify.toml")?;
        println!("Created learnify.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set GEMINI_API_KEY in your environment");
    println!("  2. Add a learner:  learnify learners add --name Noa --grade 2");
    println!("  3. Practice:       learnify practice --learner Noa --subject math --category addition");
    Ok(())
}
