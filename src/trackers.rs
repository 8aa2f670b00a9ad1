//! View state of the tracker management screen, kept separate from the
//! components so list mutations and form handling are plain functions.

use crate::error::ApiError;
use crate::types::{Category, EntryCreate, Tracker, TrackerCreate, TrackerUpdate};
use serde_json::{Map, Number, Value};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

pub const DEFAULT_COLOR: &str = "#3b82f6";
pub const ICONS: [&str; 10] = ["💪", "🏃", "🧘", "💊", "💧", "😴", "📚", "🎯", "✅", "⭐"];

pub const LOAD_FAILED: &str = "Fehler beim Laden der Tracker";
pub const DELETE_FAILED: &str = "Fehler beim Löschen";
pub const SAVE_FAILED: &str = "Fehler beim Speichern";

const ENTRY_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[day].[month].[year] [hour]:[minute]");
const NAIVE_TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Banner text for a failed backend call: what failed, then why.
pub fn failure_message(context: &str, err: &ApiError) -> String {
    format!("{context}: {}", err.user_message())
}

/// Which modal, if any, sits on top of the list.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Modal {
    #[default]
    None,
    Create,
    Edit(Tracker),
    ConfirmDelete(Tracker),
}

/// Locally cached tracker list. Mutations are applied only after the backend
/// call they mirror has succeeded.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerBoard {
    pub trackers: Vec<Tracker>,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub modal: Modal,
    pub selected: Option<String>,
}

impl Default for TrackerBoard {
    fn default() -> Self {
        Self {
            trackers: Vec::new(),
            loading: true,
            submitting: false,
            error: None,
            modal: Modal::None,
            selected: None,
        }
    }
}

impl TrackerBoard {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn loaded(&mut self, trackers: Vec<Tracker>) {
        self.trackers = trackers;
        self.loading = false;
        if let Some(id) = &self.selected
            && !self.trackers.iter().any(|tracker| &tracker.id == id)
        {
            self.selected = None;
        }
    }

    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Create;
    }

    pub fn open_edit(&mut self, tracker: Tracker) {
        self.modal = Modal::Edit(tracker);
    }

    pub fn ask_delete(&mut self, tracker: Tracker) {
        self.modal = Modal::ConfirmDelete(tracker);
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
    }

    pub fn created(&mut self, tracker: Tracker) {
        self.trackers.push(tracker);
        self.submitting = false;
        self.modal = Modal::None;
    }

    pub fn updated(&mut self, tracker: Tracker) {
        if let Some(slot) = self.trackers.iter_mut().find(|t| t.id == tracker.id) {
            *slot = tracker;
        }
        self.submitting = false;
        self.modal = Modal::None;
    }

    pub fn deleted(&mut self, tracker_id: &str) {
        self.trackers.retain(|tracker| tracker.id != tracker_id);
        if self.selected.as_deref() == Some(tracker_id) {
            self.selected = None;
        }
        self.modal = Modal::None;
    }

    /// A failed save keeps the form open so the input isn't lost.
    pub fn save_failed(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn delete_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn select(&mut self, tracker_id: Option<String>) {
        self.selected = tracker_id;
    }

    pub fn selected_tracker(&self) -> Option<&Tracker> {
        let id = self.selected.as_ref()?;
        self.trackers.iter().find(|tracker| &tracker.id == id)
    }

    pub fn editing(&self) -> Option<&Tracker> {
        match &self.modal {
            Modal::Edit(tracker) => Some(tracker),
            _ => None,
        }
    }
}

/// Contents of the create/edit form.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerDraft {
    pub name: String,
    pub category: Category,
    pub icon: String,
    pub color: String,
}

impl Default for TrackerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: Category::General,
            icon: String::new(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl TrackerDraft {
    pub fn from_tracker(tracker: Option<&Tracker>) -> Self {
        let Some(tracker) = tracker else {
            return Self::default();
        };
        Self {
            name: tracker.name.clone(),
            category: tracker.category.clone(),
            icon: tracker.icon.clone().unwrap_or_default(),
            color: tracker
                .color
                .clone()
                .filter(|color| !color.is_empty())
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// The icon is not one of the offered glyphs (came from the backend).
    pub fn has_custom_icon(&self) -> bool {
        !self.icon.is_empty() && !ICONS.contains(&self.icon.as_str())
    }

    pub fn into_create(self) -> Option<TrackerCreate> {
        if !self.is_valid() {
            return None;
        }
        Some(TrackerCreate {
            name: self.name.trim().to_string(),
            category: self.category,
            schema: Map::new(),
            icon: non_empty(self.icon),
            color: non_empty(self.color),
        })
    }

    pub fn into_update(self) -> Option<TrackerUpdate> {
        if !self.is_valid() {
            return None;
        }
        Some(TrackerUpdate {
            name: Some(self.name.trim().to_string()),
            category: Some(self.category),
            schema: None,
            icon: Some(non_empty(self.icon)),
            color: Some(non_empty(self.color)),
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses quick-entry text such as `reps=10, weight=82.5, done=true` into an
/// entry payload. Numbers and booleans are typed, everything else stays text.
/// Pieces without `=` or with an empty key are skipped.
pub fn parse_entry_fields(input: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    for piece in input.split([',', ';', '\n']) {
        let Some((key, value)) = piece.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), typed_value(value.trim()));
    }
    fields
}

fn typed_value(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>()
        && let Some(number) = Number::from_f64(float)
    {
        return Value::Number(number);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

pub fn entry_draft(fields: &str, notes: &str) -> Option<EntryCreate> {
    let data = parse_entry_fields(fields);
    if data.is_empty() {
        return None;
    }
    Some(EntryCreate {
        data,
        notes: non_empty(notes.to_string()),
        timestamp: OffsetDateTime::now_utc().format(&Rfc3339).ok(),
    })
}

/// Backend timestamps come with or without an offset; naive ones are UTC.
/// Unparsable input is shown as sent.
pub fn format_timestamp(raw: &str) -> String {
    let parsed = OffsetDateTime::parse(raw, &Rfc3339).ok().or_else(|| {
        PrimitiveDateTime::parse(raw, NAIVE_TIMESTAMP)
            .ok()
            .map(PrimitiveDateTime::assume_utc)
    });
    let Some(mut datetime) = parsed else {
        return raw.to_string();
    };
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime
        .format(ENTRY_TIME_FORMAT)
        .unwrap_or_else(|_| raw.to_string())
}
