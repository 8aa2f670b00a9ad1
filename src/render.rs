//! Mapping of a chat turn to the view it produces.
//!
//! [`resolve`] is a pure function from [`ChatMessage`] to [`RenderPlan`]: at most
//! one text bubble and at most one generative widget. The backend payload is not
//! versioned against this front-end, so every field goes through a lenient
//! string conversion and a payload that doesn't fit its widget just drops the
//! widget. Nothing in here can fail.

use crate::types::{ChatMessage, ComponentKind, Role};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    pub bubble: Option<Bubble>,
    pub widget: Option<Widget>,
}

impl RenderPlan {
    pub fn is_empty(&self) -> bool {
        self.bubble.is_none() && self.widget.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Leading,
    Trailing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub role: Role,
    pub text: String,
}

impl Bubble {
    /// User turns sit on the trailing edge in the accent colour.
    pub fn alignment(&self) -> Alignment {
        match self.role {
            Role::User => Alignment::Trailing,
            Role::Assistant => Alignment::Leading,
        }
    }

    pub fn is_accent(&self) -> bool {
        matches!(self.role, Role::User)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    Confirmation(Confirmation),
    StatCard(StatCard),
    List(ListWidget),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Confirmation {
    pub message: String,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn label(&self) -> String {
        format!("{}: {}", self.key, self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListWidget {
    pub title: Option<String>,
    pub items: Vec<ListItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
    pub id: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub value: Option<String>,
}

impl ListItem {
    /// Render key: the item id, or its position when the payload had none.
    pub fn key(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| index.to_string())
    }
}

pub fn resolve(message: &ChatMessage) -> RenderPlan {
    let bubble = (!message.content.is_empty()).then(|| Bubble {
        role: message.role,
        text: message.content.clone(),
    });

    let widget = match (message.role, message.component) {
        (Role::Assistant, Some(kind)) => resolve_widget(kind, message),
        _ => None,
    };

    RenderPlan { bubble, widget }
}

fn resolve_widget(kind: ComponentKind, message: &ChatMessage) -> Option<Widget> {
    let data = message.data.as_ref().filter(|value| !value.is_null());
    match kind {
        ComponentKind::Confirmation => Some(Widget::Confirmation(confirmation(
            &message.content,
            data,
        ))),
        ComponentKind::StatCard => data.map(|data| Widget::StatCard(stat_card(data))),
        ComponentKind::List => data.and_then(list).map(Widget::List),
        ComponentKind::Unknown => None,
    }
}

fn confirmation(message: &str, data: Option<&Value>) -> Confirmation {
    Confirmation {
        message: message.to_string(),
        tags: data.map(entries).unwrap_or_default(),
    }
}

/// Own enumerable entries of a payload: object fields in order, array
/// elements and string characters by index. Scalars have none.
fn entries(data: &Value) -> Vec<Tag> {
    let tag = |key: String, value: String| Tag { key, value };
    match data {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| tag(key.clone(), display_string(value)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| tag(index.to_string(), display_string(value)))
            .collect(),
        Value::String(text) => text
            .chars()
            .enumerate()
            .map(|(index, ch)| tag(index.to_string(), ch.to_string()))
            .collect(),
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

fn stat_card(data: &Value) -> StatCard {
    StatCard {
        title: field_or_empty(data, "title"),
        value: field_or_empty(data, "value"),
        subtitle: truthy_field(data, "subtitle"),
    }
}

fn list(data: &Value) -> Option<ListWidget> {
    let items = data.get("items")?.as_array()?;
    Some(ListWidget {
        title: truthy_field(data, "title"),
        items: items.iter().map(list_item).collect(),
    })
}

fn list_item(item: &Value) -> ListItem {
    ListItem {
        id: present_field(item, "id"),
        title: field_or_empty(item, "title"),
        subtitle: present_field(item, "subtitle"),
        value: present_field(item, "value"),
    }
}

fn field<'a>(container: &'a Value, key: &str) -> Option<&'a Value> {
    container
        .as_object()
        .and_then(|fields| fields.get(key))
        .filter(|value| !value.is_null())
}

/// `String(x ?? "")`
fn field_or_empty(container: &Value, key: &str) -> String {
    field(container, key).map(display_string).unwrap_or_default()
}

/// `x != null ? String(x) : undefined`
fn present_field(container: &Value, key: &str) -> Option<String> {
    field(container, key).map(display_string)
}

/// `x ? String(x) : undefined`
fn truthy_field(container: &Value, key: &str) -> Option<String> {
    field(container, key)
        .filter(|value| is_truthy(value))
        .map(display_string)
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Default string conversion for any payload value. Never fails.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_i64() {
            Some(int) if int.unsigned_abs() <= MAX_SAFE_INTEGER => int.to_string(),
            _ => number.as_f64().map(format_number).unwrap_or_default(),
        },
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Largest integer every f64 holds exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Number formatting with the browser's `Number.prototype.toString` rules:
/// shortest round-trip digits, plain decimals for exponents in `-7 < e < 21`,
/// exponent form (`1e+21`, `1.5e-7`) outside that range.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `1.2345e23`.
    let scientific = format!("{n:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let count = digits.len() as i32;
    let point = exponent + 1;

    if count <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - count) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{whole}.{fraction}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat(-point as usize))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{sign}{}", exponent.abs())
        } else {
            format!("{lead}.{rest}e{sign}{}", exponent.abs())
        }
    }
}

/// Tags for an arbitrary map, used by the entry list as well.
pub fn tags_for(fields: &Map<String, Value>) -> Vec<Tag> {
    fields
        .iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: display_string(value),
        })
        .collect()
}
