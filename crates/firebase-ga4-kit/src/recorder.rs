//! In-memory client and host that record every call.
//!
//! Used by tests and by host harnesses that want to inspect what the kit
//! would forward without a real analytics SDK behind it.

use crate::bundle::Bundle;
use crate::client::{AnalyticsClient, KitHost};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An event recorded by [`MemoryClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEvent {
    pub name: String,
    pub bundle: Bundle,
}

/// A screen recorded by [`MemoryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub screen: String,
    pub screen_name: String,
    pub class_override: Option<String>,
}

#[derive(Debug, Default)]
struct ClientState {
    events: Vec<LoggedEvent>,
    screens: Vec<ScreenView>,
    user_ids: Vec<String>,
    user_properties: Vec<(String, Option<String>)>,
    instance_id_requests: Vec<oneshot::Sender<String>>,
}

/// [`AnalyticsClient`] that keeps every call in memory.
///
/// Installation id requests stay pending until [`complete_instance_id`]
/// or [`drop_instance_id`] is called.
///
/// [`complete_instance_id`]: MemoryClient::complete_instance_id
/// [`drop_instance_id`]: MemoryClient::drop_instance_id
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    state: Arc<Mutex<ClientState>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// All logged events, oldest first.
    pub fn events(&self) -> Vec<LoggedEvent> {
        lock(&self.state).events.clone()
    }

    /// Names of all logged events, oldest first.
    pub fn event_names(&self) -> Vec<String> {
        lock(&self.state)
            .events
            .iter()
            .map(|event| event.name.clone())
            .collect()
    }

    pub fn screens(&self) -> Vec<ScreenView> {
        lock(&self.state).screens.clone()
    }

    pub fn user_ids(&self) -> Vec<String> {
        lock(&self.state).user_ids.clone()
    }

    /// Every user property write, including clears.
    pub fn user_properties(&self) -> Vec<(String, Option<String>)> {
        lock(&self.state).user_properties.clone()
    }

    /// Latest value written for a user property; `None` when never set or cleared.
    pub fn user_property(&self, key: &str) -> Option<String> {
        lock(&self.state)
            .user_properties
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .and_then(|(_, value)| value.clone())
    }

    /// Number of outbound calls of any kind.
    pub fn call_count(&self) -> usize {
        let state = lock(&self.state);
        state.events.len() + state.screens.len() + state.user_ids.len() + state.user_properties.len()
    }

    /// Number of installation id requests still waiting for an answer.
    pub fn pending_instance_id_requests(&self) -> usize {
        lock(&self.state).instance_id_requests.len()
    }

    /// Answer every pending installation id request.
    pub fn complete_instance_id(&self, instance_id: &str) {
        let requests = std::mem::take(&mut lock(&self.state).instance_id_requests);
        for request in requests {
            let _ = request.send(instance_id.to_string());
        }
    }

    /// Drop every pending installation id request unanswered.
    pub fn drop_instance_id(&self) {
        lock(&self.state).instance_id_requests.clear();
    }

    /// Forget every recorded call.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.events.clear();
        state.screens.clear();
        state.user_ids.clear();
        state.user_properties.clear();
    }
}

impl AnalyticsClient for MemoryClient {
    fn log_event(&self, name: &str, bundle: Bundle) {
        lock(&self.state).events.push(LoggedEvent {
            name: name.to_string(),
            bundle,
        });
    }

    fn set_current_screen(&self, screen: &str, screen_name: &str, class_override: Option<&str>) {
        lock(&self.state).screens.push(ScreenView {
            screen: screen.to_string(),
            screen_name: screen_name.to_string(),
            class_override: class_override.map(str::to_string),
        });
    }

    fn set_user_id(&self, user_id: &str) {
        lock(&self.state).user_ids.push(user_id.to_string());
    }

    fn set_user_property(&self, key: &str, value: Option<&str>) {
        lock(&self.state)
            .user_properties
            .push((key.to_string(), value.map(str::to_string)));
    }

    fn app_instance_id(&self) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        lock(&self.state).instance_id_requests.push(tx);
        rx
    }
}

#[derive(Debug, Default)]
struct HostState {
    current_activity: Option<String>,
    integration_attributes: HashMap<String, String>,
}

/// [`KitHost`] with a settable current activity that keeps integration
/// attributes in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host with a foreground activity.
    pub fn with_activity(activity: impl Into<String>) -> Self {
        let host = Self::new();
        host.set_current_activity(Some(activity.into()));
        host
    }

    pub fn set_current_activity(&self, activity: Option<String>) {
        lock(&self.state).current_activity = activity;
    }

    pub fn integration_attributes(&self) -> HashMap<String, String> {
        lock(&self.state).integration_attributes.clone()
    }
}

impl KitHost for MemoryHost {
    fn current_activity(&self) -> Option<String> {
        lock(&self.state).current_activity.clone()
    }

    fn set_integration_attributes(&self, attributes: HashMap<String, String>) {
        lock(&self.state).integration_attributes.extend(attributes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_records_calls_in_order() {
        let client = MemoryClient::new();

        client.log_event("first", Bundle::new());
        client.log_event("second", Bundle::new().put_string("k", Some("v")));
        client.set_user_id("user_1");
        client.set_user_property("plan", Some("pro"));
        client.set_user_property("plan", None);

        assert_eq!(client.event_names(), vec!["first", "second"]);
        assert_eq!(client.events()[1].bundle.get_string("k"), Some("v"));
        assert_eq!(client.user_ids(), vec!["user_1"]);
        assert_eq!(client.user_properties().len(), 2);
        assert_eq!(client.user_property("plan"), None);
        assert_eq!(client.call_count(), 5);
    }

    #[test]
    fn test_clear() {
        let client = MemoryClient::new();
        client.log_event("first", Bundle::new());
        client.set_current_screen("MainActivity", "home", None);

        client.clear();

        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let client = MemoryClient::new();
        let handle = client.clone();

        handle.set_user_id("shared");

        assert_eq!(client.user_ids(), vec!["shared"]);
    }

    #[tokio::test]
    async fn test_instance_id_completion() {
        let client = MemoryClient::new();
        let rx = client.app_instance_id();
        assert_eq!(client.pending_instance_id_requests(), 1);

        client.complete_instance_id("abc");

        assert_eq!(rx.await.unwrap(), "abc");
        assert_eq!(client.pending_instance_id_requests(), 0);
    }

    #[tokio::test]
    async fn test_instance_id_dropped() {
        let client = MemoryClient::new();
        let rx = client.app_instance_id();

        client.drop_instance_id();

        assert!(rx.await.is_err());
    }

    #[test]
    fn test_host_activity_and_attributes() {
        let host = MemoryHost::with_activity("MainActivity");
        assert_eq!(host.current_activity().as_deref(), Some("MainActivity"));

        host.set_current_activity(None);
        assert_eq!(host.current_activity(), None);

        host.set_integration_attributes(HashMap::from([("a".to_string(), "1".to_string())]));
        host.set_integration_attributes(HashMap::from([("b".to_string(), "2".to_string())]));
        assert_eq!(host.integration_attributes().len(), 2);
    }
}
