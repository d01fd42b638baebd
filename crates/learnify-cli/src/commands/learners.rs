//! The `learnify learners` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use learnify_core::model::{Grade, Learner, Subject};

use super::open_store;

pub fn list(config: Option<PathBuf>, store: Option<PathBuf>) -> Result<()> {
    let (_, roster) = open_store(config.as_deref(), store)?;

    if roster.learners().is_empty() {
        println!("No learners yet. Add one with: learnify learners add --name <name> --grade <1-6>");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Name", "Grade", "Math", "English", "Hebrew",
    ]);
    for learner in roster.learners() {
        let progress = roster.progress_for(learner.id);
        table.add_row(vec![
            Cell::new(&learner.name),
            Cell::new(learner.grade),
            Cell::new(format!("{:.0}%", progress.get(Subject::Math))),
            Cell::new(format!("{:.0}%", progress.get(Subject::English))),
            Cell::new(format!("{:.0}%", progress.get(Subject::Hebrew))),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn add(
    name: String,
    grade: u8,
    config: Option<PathBuf>,
    store: Option<PathBuf>,
) -> Result<()> {
    let (_, mut roster) = open_store(config.as_deref(), store)?;

    anyhow::ensure!(
        roster.find_learner(&name).is_none(),
        "a learner named {name} already exists"
    );
    let grade = Grade::new(grade)
        .map_err(anyhow::Error::msg)
        .context("invalid grade")?;

    let learner = Learner::new(name.clone(), grade);
    roster.add_learner(learner)?;
    println!("Added {name} (grade {grade})");
    Ok(())
}
