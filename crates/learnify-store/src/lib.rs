//! learnify-store — Learner roster and progress persistence.
//!
//! A single JSON file holds the learner list and each learner's
//! per-subject progress. Writes are whole-file, last-writer-wins; there is
//! no schema versioning or partial-write recovery. A missing file is an
//! empty roster.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnify_core::model::{Learner, Progress, Subject};

/// Everything the store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub learners: Vec<Learner>,
    /// Per-learner per-subject progress, keyed by learner id.
    #[serde(default)]
    pub progress: HashMap<Uuid, Progress>,
    /// When the file was last written.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// File-backed roster store.
pub struct RosterStore {
    path: PathBuf,
    roster: Roster,
}

impl RosterStore {
    /// Open the store, reading the file if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let roster = if path.exists() {
            load_roster(&path)?
        } else {
            Roster::default()
        };
        Ok(Self { path, roster })
    }

    pub fn learners(&self) -> &[Learner] {
        &self.roster.learners
    }

    /// Find a learner by display name (case-insensitive).
    pub fn find_learner(&self, name: &str) -> Option<&Learner> {
        self.roster
            .learners
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Add a learner and persist. Progress starts at zero per subject.
    pub fn add_learner(&mut self, learner: Learner) -> Result<()> {
        self.roster
            .progress
            .insert(learner.id, Progress::default());
        self.roster.learners.push(learner);
        self.save()
    }

    /// Current progress for a learner, zeros if never recorded.
    pub fn progress_for(&self, learner_id: Uuid) -> Progress {
        self.roster
            .progress
            .get(&learner_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Record a learner's new progress value for a subject and persist.
    pub fn record_progress(
        &mut self,
        learner_id: Uuid,
        subject: Subject,
        value: f64,
    ) -> Result<()> {
        self.roster
            .progress
            .entry(learner_id)
            .or_default()
            .set(subject, value);
        self.save()
    }

    /// Write the whole roster out. Last writer wins.
    pub fn save(&mut self) -> Result<()> {
        self.roster.updated_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(&self.roster)
            .context("failed to serialize roster")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write roster to {}", self.path.display()))?;
        tracing::debug!("roster saved to {}", self.path.display());
        Ok(())
    }
}

fn load_roster(path: &Path) -> Result<Roster> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster from {}", path.display()))?;
    let roster: Roster =
        serde_json::from_str(&content).context("failed to parse roster JSON")?;
    Ok(roster)
}
