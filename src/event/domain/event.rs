//! The task event record and its kind tag.

use super::EventDecodeError;
use crate::task::domain::Task;
use chrono::{DateTime, NaiveDateTime};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of mutation a [`TaskEvent`] reports.
///
/// Unrecognised tags decode to [`TaskEventKind::Other`] rather than failing,
/// so consumers keep working when producers learn new kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskEventKind {
    /// A task was created.
    Created,
    /// A task was updated.
    Updated,
    /// A task was deleted.
    Deleted,
    /// A tag this build does not know.
    Other(String),
}

impl TaskEventKind {
    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
            Self::Deleted => "DELETED",
            Self::Other(tag) => tag,
        }
    }

    /// Returns `true` for the three kinds this build dispatches.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for TaskEventKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "CREATED" => Self::Created,
            "UPDATED" => Self::Updated,
            "DELETED" => Self::Deleted,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for TaskEventKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<TaskEventKind> for String {
    fn from(kind: TaskEventKind) -> Self {
        match kind {
            TaskEventKind::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TaskEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a task at the moment it was mutated.
///
/// Encodes as a flat JSON object with `taskId`, `title`, `description`,
/// `status`, `eventType`, and `timestamp`. The timestamp is a local wall-clock
/// reading without offset and is informational only: on decode a missing,
/// `null`, or unreadable timestamp becomes `None`, and an offset suffix is
/// dropped in favour of the wall-clock reading it qualifies. Unknown fields
/// are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
    task_id: i64,
    title: String,
    description: Option<String>,
    status: String,
    event_type: TaskEventKind,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    timestamp: Option<NaiveDateTime>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>().ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|zoned| zoned.naive_local())
    })
}

impl TaskEvent {
    /// Builds an event from a task snapshot, stamped with the clock's local
    /// time.
    #[must_use]
    pub fn from_task(task: &Task, kind: TaskEventKind, clock: &impl Clock) -> Self {
        Self {
            task_id: task.id().value(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            status: task.status().as_str().to_owned(),
            event_type: kind,
            timestamp: Some(clock.local().naive_local()),
        }
    }

    /// Decodes an event from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`EventDecodeError::Payload`] when the bytes are not a task
    /// event.
    pub fn decode(payload: &[u8]) -> Result<Self, EventDecodeError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Encodes the event as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; this cannot happen for well-formed
    /// values but is surfaced rather than hidden.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Returns the partitioning key: the task identifier in string form.
    #[must_use]
    pub fn key(&self) -> String {
        self.task_id.to_string()
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> i64 {
        self.task_id
    }

    /// Returns the title snapshot.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description snapshot.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status snapshot.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn event_type(&self) -> &TaskEventKind {
        &self.event_type
    }

    /// Returns the emission timestamp, if the producer supplied a readable
    /// one.
    #[must_use]
    pub const fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}
