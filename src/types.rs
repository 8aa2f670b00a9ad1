use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Discriminator choosing the generative widget of an assistant turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Confirmation,
    StatCard,
    List,
    /// Widgets this front-end doesn't know (`routine-card`, `weekly-view`, ...).
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            component: None,
            data: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            component: None,
            data: None,
        }
    }
}

impl From<ChatResponse> for ChatMessage {
    fn from(response: ChatResponse) -> Self {
        Self {
            role: Role::Assistant,
            content: response.message,
            component: response.component,
            data: response.data,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub component: Option<ComponentKind>,
    #[serde(default)]
    pub tracker: Option<String>,
}

// =============================================================================
// Trackers
// =============================================================================

/// Tracker category. The backend accepts any string; the known ones get labels
/// and colours.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Fitness,
    Health,
    Habit,
    Productivity,
    #[default]
    General,
    Other(String),
}

impl Category {
    pub const KNOWN: [Category; 5] = [
        Category::Fitness,
        Category::Health,
        Category::Habit,
        Category::Productivity,
        Category::General,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "fitness" => Category::Fitness,
            "health" => Category::Health,
            "habit" => Category::Habit,
            "productivity" => Category::Productivity,
            "general" => Category::General,
            other => Category::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Fitness => "fitness",
            Category::Health => "health",
            Category::Habit => "habit",
            Category::Productivity => "productivity",
            Category::General => "general",
            Category::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Fitness => "Fitness",
            Category::Health => "Gesundheit",
            Category::Habit => "Gewohnheit",
            Category::Productivity => "Produktivität",
            Category::General => "Allgemein",
            Category::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::parse(&raw))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub schema: Map<String, Value>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrackerCreate {
    pub name: String,
    pub category: Category,
    pub schema: Map<String, Value>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Partial update; fields left `None` are not sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrackerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Entries
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub tracker_id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub notes: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EntryCreate {
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// RFC 3339; omitted means "now" on the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

// =============================================================================
// Workout endpoints
// =============================================================================

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WorkoutStarted {
    pub status: String,
    #[serde(default)]
    pub routine: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct WorkoutSummary {
    /// Minutes, when the backend knew the start time.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub exercises_completed: u32,
    #[serde(default)]
    pub completed_exercises: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WorkoutEnded {
    pub status: String,
    #[serde(default)]
    pub summary: WorkoutSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_component_decodes_instead_of_failing() {
        let response: ChatResponse = serde_json::from_value(json!({
            "action": "routine",
            "message": "Plan steht",
            "component": "routine-card",
            "data": {"name": "Push"}
        }))
        .unwrap();
        assert_eq!(response.component, Some(ComponentKind::Unknown));
    }

    #[test]
    fn null_data_and_component_are_absent() {
        let response: ChatResponse = serde_json::from_value(json!({
            "action": "chat",
            "message": "Hi",
            "data": null,
            "component": null
        }))
        .unwrap();
        let message = ChatMessage::from(response);
        assert_eq!(message.role, Role::Assistant);
        assert!(message.data.is_none());
        assert!(message.component.is_none());
    }

    #[test]
    fn stat_card_discriminator_is_kebab_case() {
        let kind: ComponentKind = serde_json::from_value(json!("stat-card")).unwrap();
        assert_eq!(kind, ComponentKind::StatCard);
    }

    #[test]
    fn caller_supplied_category_round_trips_verbatim() {
        let tracker: Tracker = serde_json::from_value(json!({
            "id": "t1",
            "name": "Lesen",
            "category": "learning",
            "schema": {},
            "icon": null,
            "color": null,
            "created_at": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(tracker.category, Category::Other("learning".into()));
        assert_eq!(tracker.category.label(), "learning");
        assert_eq!(serde_json::to_value(&tracker.category).unwrap(), json!("learning"));
    }

    #[test]
    fn tracker_update_only_sends_set_fields() {
        let update = TrackerUpdate {
            name: Some("Wasser".into()),
            icon: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"name": "Wasser", "icon": null})
        );
    }

    #[test]
    fn entry_create_omits_missing_timestamp() {
        let mut data = Map::new();
        data.insert("reps".into(), json!(10));
        let body = serde_json::to_value(EntryCreate {
            data,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"data": {"reps": 10}}));
    }
}
