use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

const BUILTIN_FIXTURES: &str = include_str!("../data/padel_fixtures.json");
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sport: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BadPoint {
    pub text: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisRecord {
    pub date: String,
    pub summary: String,
    // (label, score) pairs; order is axis order on the radar chart.
    pub stats: Vec<(String, f64)>,
    #[serde(default)]
    pub good_points: Vec<String>,
    #[serde(default)]
    pub bad_points: Vec<BadPoint>,
    #[serde(default)]
    pub improved_points: Vec<String>,
    #[serde(default)]
    pub coach_notes: String,
}

impl AnalysisRecord {
    /// `"Serve Analysis - 2023-10-22"`, the label used by the record picker.
    pub fn picker_label(&self) -> String {
        format!("{} - {}", self.summary, self.date)
    }

    /// Long-form date for headings, falling back to the raw string.
    pub fn date_label(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, DATE_FORMAT) {
            Ok(date) => date.format("%d %b %Y").to_string(),
            Err(_) => self.date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerHistory {
    pub player_id: u32,
    #[serde(default)]
    pub records: Vec<AnalysisRecord>,
}

/// Roster plus per-player histories, validated once at load.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FixtureSet {
    pub players: Vec<Player>,
    #[serde(default)]
    pub histories: Vec<PlayerHistory>,
}

impl FixtureSet {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_FIXTURES).context("built-in fixtures")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading fixtures from {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("fixtures in {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let set: FixtureSet = serde_json::from_str(raw).context("parsing fixture json")?;
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for player in &self.players {
            if player.name.trim().is_empty() {
                bail!("player {} has an empty name", player.id);
            }
            if !ids.insert(player.id) {
                bail!("duplicate player id {}", player.id);
            }
        }

        let mut seen_histories = HashSet::new();
        for history in &self.histories {
            if !ids.contains(&history.player_id) {
                bail!("history references unknown player id {}", history.player_id);
            }
            if !seen_histories.insert(history.player_id) {
                bail!("player {} has more than one history", history.player_id);
            }
            for record in &history.records {
                validate_record(history.player_id, record)?;
            }
        }
        Ok(())
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn history(&self, player_id: u32) -> Option<&PlayerHistory> {
        self.histories.iter().find(|h| h.player_id == player_id)
    }

    /// Records for a player; empty for unknown ids or players without history.
    pub fn records(&self, player_id: u32) -> &[AnalysisRecord] {
        self.history(player_id)
            .map(|h| h.records.as_slice())
            .unwrap_or(&[])
    }
}

fn validate_record(player_id: u32, record: &AnalysisRecord) -> Result<()> {
    NaiveDate::parse_from_str(&record.date, DATE_FORMAT).with_context(|| {
        format!(
            "player {player_id}: record '{}' has bad date '{}'",
            record.summary, record.date
        )
    })?;
    let mut labels = HashSet::new();
    for (label, score) in &record.stats {
        if !labels.insert(label.as_str()) {
            bail!(
                "player {player_id}: record '{}' has duplicate stat '{label}'",
                record.summary
            );
        }
        if !(0.0..=100.0).contains(score) {
            bail!(
                "player {player_id}: record '{}' stat '{label}' = {score} outside 0..=100",
                record.summary
            );
        }
    }
    Ok(())
}

/// Bad points bucketed High -> Medium -> Low, skipping empty buckets.
pub fn group_by_priority(points: &[BadPoint]) -> Vec<(Priority, Vec<&BadPoint>)> {
    Priority::ALL
        .iter()
        .filter_map(|priority| {
            let bucket: Vec<&BadPoint> = points.iter().filter(|p| p.priority == *priority).collect();
            if bucket.is_empty() {
                None
            } else {
                Some((*priority, bucket))
            }
        })
        .collect()
}

pub fn priority_heading(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "Top Priorities:",
        Priority::Medium => "Medium Priority:",
        Priority::Low => "Low Priority:",
    }
}

pub fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}
