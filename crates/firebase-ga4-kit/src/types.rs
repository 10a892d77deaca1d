//! Inbound event, user and reporting types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds.
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Category of a generic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventType {
    Navigation,
    Location,
    Search,
    Transaction,
    UserContent,
    UserPreference,
    Social,
    Media,
    #[default]
    Other,
}

/// A generic named event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MpEvent {
    pub event_name: String,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub custom_attributes: HashMap<String, String>,
    /// Set when the host routes a screen view through the event path.
    #[serde(default)]
    pub screen_event: bool,
}

/// Identity kinds a user can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityType {
    Other,
    CustomerId,
    Facebook,
    Twitter,
    Google,
    Microsoft,
    Yahoo,
    Email,
    Alias,
    FacebookCustomAudienceId,
    Other2,
    Other3,
    Other4,
    Other5,
    Other6,
    Other7,
    Other8,
    Other9,
    Other10,
    MobileNumber,
    PhoneNumber2,
    PhoneNumber3,
}

/// The current user as seen by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Host-assigned numeric id.
    pub mpid: i64,
    #[serde(default)]
    pub identities: HashMap<IdentityType, String>,
    /// String-valued user attributes.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl User {
    pub fn new(mpid: i64) -> Self {
        Self {
            mpid,
            ..Self::default()
        }
    }

    pub fn identity(&self, identity_type: IdentityType) -> Option<&str> {
        self.identities.get(&identity_type).map(String::as_str)
    }
}

/// Kind of forwarded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Event,
    CommerceEvent,
    ScreenView,
}

/// Record of something the kit forwarded, returned to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingMessage {
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub timestamp: i64,
}

impl ReportingMessage {
    pub(crate) fn new(message_type: MessageType, event_name: Option<String>) -> Self {
        Self {
            message_type,
            event_name,
            timestamp: now_ms(),
        }
    }
}
