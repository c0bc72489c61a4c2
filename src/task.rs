//! Task data structure and its persisted shape.
//!
//! A `Task` is a single to-do item. It serialises to one JSON object per task
//! with the field names `ID`, `TitleStr`, `DescStr`, `DueDate` and `Done`.
//! Identifiers are part of the durable format; records written without an
//! `ID` receive a fresh one when they are read back.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single to-do item.
///
/// `id` is assigned once, when the task is created, and is carried unchanged
/// through edits, toggles and save/load cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "ID", default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "TitleStr", default)]
    pub title: String,
    #[serde(rename = "DescStr", default)]
    pub description: String,
    #[serde(rename = "DueDate", default, deserialize_with = "deserialize_due")]
    pub due: Option<DateTime<Utc>>,
    #[serde(rename = "Done", default)]
    pub done: bool,
}

impl Task {
    /// Create an empty task with a freshly generated identifier.
    pub fn new() -> Self {
        Task {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            due: None,
            done: false,
        }
    }

    /// Create a task with the given fields and a freshly generated identifier.
    pub fn with_fields(
        title: impl Into<String>,
        description: impl Into<String>,
        due: Option<DateTime<Utc>>,
        done: bool,
    ) -> Self {
        Task {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            due,
            done,
        }
    }

    /// Replace the identifier. Used when rebuilding an edited task so it keeps
    /// the identity of the task it replaces.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// True when title and description are empty, no due date is set and the
    /// task is not done.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.due.is_none() && !self.done
    }
}

impl Default for Task {
    fn default() -> Self {
        Task::new()
    }
}

/// Give every task after the first occurrence of an identifier a fresh one.
///
/// Returns how many identifiers were replaced.
pub fn dedupe_ids(tasks: &mut [Task]) -> usize {
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut replaced = 0;
    for task in tasks.iter_mut() {
        while !seen.insert(task.id) {
            task.id = Uuid::new_v4();
            replaced += 1;
        }
    }
    replaced
}

/// Accepts a missing value, `null`, an empty string, or the zero timestamp
/// `0001-01-01T00:00:00Z` as "no due date".
fn deserialize_due<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(raw.trim()).map_err(serde::de::Error::custom)?;
    let utc = parsed.with_timezone(&Utc);
    if utc.year() <= 1 {
        Ok(None)
    } else {
        Ok(Some(utc))
    }
}
