use crate::domain::ids::TagId;
use serde::{Deserialize, Serialize};

/// A free-standing label; tasks reference tags by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Tag {
    /// Creates a tag with a freshly generated id
    pub fn new(name: String, color: String, icon: String) -> Self {
        Self::with_id(TagId::generate(), name, color, icon)
    }

    pub fn with_id(id: TagId, name: String, color: String, icon: String) -> Self {
        Self {
            id,
            name,
            color,
            icon,
        }
    }
}

/// Seed tags for a fresh board
pub fn default_tags() -> Vec<Tag> {
    [
        ("urgent", "Urgent", "#ef4444", "🔥"),
        ("feature", "Feature", "#8b5cf6", "⭐"),
        ("bug", "Bug", "#f97316", "🐛"),
        ("improvement", "Improvement", "#06b6d4", "💡"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| {
        Tag::with_id(
            TagId::from(id),
            name.to_string(),
            color.to_string(),
            icon.to_string(),
        )
    })
    .collect()
}

/// Field updates for a tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl TagUpdate {
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
    fn test_default_tags() {
        let tags = default_tags();
        assert_eq!(tags.len(), 4);
        assert_eq!(tags[0].id.as_str(), "urgent");
        assert_eq!(tags[2].name, "Bug");
    }

    #[test]
    fn test_tag_update_omits_absent_fields() {
        let update = TagUpdate::new().color("#000000");
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r##"{"color":"#000000"}"##);
        assert!(!update.is_empty());
        assert!(TagUpdate::new().is_empty());
    }
}
