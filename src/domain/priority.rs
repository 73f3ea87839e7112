use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Priority of a task. The set of levels is fixed; only the display
/// metadata attached to each level is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All levels, lowest first
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Numeric rank used for ordering (low = 1, urgent = 4)
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(format!(
                "Invalid priority '{}'. Valid priorities: low, medium, high, urgent",
                s
            )),
        }
    }
}

/// Display metadata for one priority level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLevel {
    pub id: Priority,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl PriorityLevel {
    pub fn new(id: Priority, name: &str, color: &str, icon: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }

    /// Built-in metadata for a level
    pub fn default_for(id: Priority) -> Self {
        match id {
            Priority::Low => Self::new(id, "Low", "#6b7280", "🔽"),
            Priority::Medium => Self::new(id, "Medium", "#3b82f6", "➖"),
            Priority::High => Self::new(id, "High", "#f97316", "🔼"),
            Priority::Urgent => Self::new(id, "Urgent", "#9333ea", "🔥"),
        }
    }
}

/// The full priority table in canonical order
pub fn default_priorities() -> Vec<PriorityLevel> {
    Priority::ALL
        .iter()
        .map(|p| PriorityLevel::default_for(*p))
        .collect()
}

/// Rebuilds a persisted priority table so it holds exactly one entry per
/// level in canonical order, keeping stored metadata where present.
pub fn normalize_priorities(stored: Vec<PriorityLevel>) -> Vec<PriorityLevel> {
    Priority::ALL
        .iter()
        .map(|p| {
            stored
                .iter()
                .find(|level| level.id == *p)
                .cloned()
                .unwrap_or_else(|| PriorityLevel::default_for(*p))
        })
        .collect()
}

/// Field updates for a priority level's metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl PriorityUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.icon.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_rank_ordering() {
        assert!(Priority::Low.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Urgent.rank());
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!(Priority::from_str("URGENT").unwrap(), Priority::Urgent);
        assert_eq!(Priority::from_str(" low ").unwrap(), Priority::Low);
        assert!(Priority::from_str("critical").is_err());
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn test_normalize_fills_missing_and_keeps_edits() {
        let mut edited = PriorityLevel::default_for(Priority::High);
        edited.name = "Important".to_string();

        let normalized = normalize_priorities(vec![edited]);

        assert_eq!(normalized.len(), 4);
        assert_eq!(normalized[0].id, Priority::Low);
        assert_eq!(normalized[2].name, "Important");
        assert_eq!(normalized[3], PriorityLevel::default_for(Priority::Urgent));
    }
}
