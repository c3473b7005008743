//! Core types for Marquee
//!
//! Content metadata snapshots and the notifications that carry them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::Result;

/// A loosely typed scalar as delivered by the host page.
///
/// Episode numbers, season numbers and air dates arrive as strings or
/// numbers depending on the feed, so they are kept as-is and only
/// interpreted when a token asks for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    /// Host truthiness: empty strings, zero, NaN and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Integer(n) => *n != 0,
            FieldValue::Float(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Bool(b) => *b,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            // Whole floats render like integers ("3", not "3.0")
            FieldValue::Float(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

/// Content metadata for the clip currently loaded in the player.
///
/// Each snapshot is received as a unit and replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentMetadataSnapshot {
    #[serde(deserialize_with = "null_as_empty")]
    pub show_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub day_part: String,
    pub primary_category: Option<FieldValue>,
    pub secondary_category: Option<FieldValue>,
    #[serde(deserialize_with = "null_as_empty")]
    pub entitlement: String,
    pub air_order: Option<FieldValue>,
    #[serde(deserialize_with = "null_as_empty")]
    pub guid: String,
    /// Raw date-like value, parsed only when `[AIRDATE]` is resolved
    pub air_date: Option<FieldValue>,
    pub season_number: Option<FieldValue>,
}

impl ContentMetadataSnapshot {
    /// Create a snapshot with just a show name
    pub fn new(show_name: impl Into<String>) -> Self {
        Self {
            show_name: show_name.into(),
            ..Default::default()
        }
    }

    /// True when the entitlement tag marks the content as requiring auth
    pub fn is_restricted(&self) -> bool {
        self.entitlement == "auth"
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page-to-player context pushed by the embedding page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// Provider (MVPD) id; older pages send it as `mvpdid`
    #[serde(default, alias = "mvpdid")]
    pub provider_id: Option<String>,
}

impl PageContext {
    pub fn with_provider(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: Some(provider_id.into()),
        }
    }
}

/// Notifications delivered by the host event dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Notification {
    /// A new content metadata snapshot
    MetadataUpdated(ContentMetadataSnapshot),
    /// Page context changed (may carry a provider id)
    PageContextUpdated(PageContext),
    /// Player entered or left full screen
    FullScreenChanged(bool),
}

impl Notification {
    /// Notification kind, used for subscription filtering
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::MetadataUpdated(_) => NotificationKind::MetadataUpdated,
            Notification::PageContextUpdated(_) => NotificationKind::PageContextUpdated,
            Notification::FullScreenChanged(_) => NotificationKind::FullScreenChanged,
        }
    }

    /// Decode a single notification from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a JSON array of notifications, preserving order
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MetadataUpdated,
    PageContextUpdated,
    FullScreenChanged,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::MetadataUpdated => write!(f, "metadata_updated"),
            NotificationKind::PageContextUpdated => write!(f, "page_context_updated"),
            NotificationKind::FullScreenChanged => write!(f, "full_screen_changed"),
        }
    }
}
