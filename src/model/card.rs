use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Card priority. An absent priority means "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Sort rank, highest first. `None` ranks below every priority.
    pub fn rank(priority: Option<Priority>) -> u8 {
        match priority {
            Some(Priority::High) => 3,
            Some(Priority::Medium) => 2,
            Some(Priority::Low) => 1,
            None => 0,
        }
    }

    /// Cycle: none → low → medium → high → none
    pub fn cycle(priority: Option<Priority>) -> Option<Priority> {
        match priority {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Format used for card due dates (ISO 8601 date, no time)
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single task item on a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub completed: bool,
    /// List the card came from; only set while completed.
    /// Non-owning: the list may have been deleted since.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_list_id: Option<String>,
}

impl Card {
    pub fn new(id: String, name: String) -> Self {
        Card {
            id,
            name,
            due: None,
            priority: None,
            completed: false,
            previous_list_id: None,
        }
    }

    /// The due date, if present and well-formed
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DUE_DATE_FORMAT).ok())
    }
}
