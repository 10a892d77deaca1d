//! The kit: every notification the host delivers.

use crate::bundle::{Bundle, BundleValue};
use crate::classify::map_commerce_event;
use crate::client::{AnalyticsClient, KitHost};
use crate::commerce::CommerceEvent;
use crate::config::{Config, Ga4KitBuilder};
use crate::constants::{event, INSTANCE_ID_INTEGRATION_KEY, KIT_NAME};
use crate::identity::resolve_user_id;
use crate::standardize::Standardizer;
use crate::types::{EventType, MessageType, MpEvent, ReportingMessage, User};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// GA4 for Firebase kit.
///
/// Holds the wrapped analytics client and the host for its whole lifetime.
/// When server-side forwarding is enabled every entry point except
/// [`on_kit_create`](Ga4Kit::on_kit_create) is a no-op.
///
/// # Example
///
/// ```rust,ignore
/// use firebase_ga4_kit::{EventType, Ga4Kit, MemoryClient, MemoryHost, MpEventBuilder};
/// use std::sync::Arc;
///
/// let client = MemoryClient::new();
/// let kit = Ga4Kit::builder(Arc::new(client.clone()), Arc::new(MemoryHost::new()))
///     .settings_json(r#"{"externalUserIdentityType": "CustomerId"}"#)
///     .build()?;
///
/// kit.log_event(&MpEventBuilder::new("Sign Up", EventType::Other).build());
/// assert_eq!(client.event_names(), vec!["Sign_Up"]);
/// ```
pub struct Ga4Kit {
    client: Arc<dyn AnalyticsClient>,
    host: Arc<dyn KitHost>,
    config: Config,
    standardizer: Standardizer,
}

impl fmt::Debug for Ga4Kit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ga4Kit")
            .field("config", &self.config)
            .field("standardizer", &self.standardizer)
            .finish_non_exhaustive()
    }
}

impl Ga4Kit {
    /// Create a new builder around the wrapped client and the host.
    pub fn builder(client: Arc<dyn AnalyticsClient>, host: Arc<dyn KitHost>) -> Ga4KitBuilder {
        Ga4KitBuilder::new(client, host)
    }

    pub(crate) fn from_parts(
        client: Arc<dyn AnalyticsClient>,
        host: Arc<dyn KitHost>,
        config: Config,
        standardizer: Standardizer,
    ) -> Self {
        Self {
            client,
            host,
            config,
            standardizer,
        }
    }

    pub fn name(&self) -> &'static str {
        KIT_NAME
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn forwarding_suppressed(&self, operation: &'static str) -> bool {
        if self.config.forward_requests_server_side() {
            debug!(operation, "Forwarding server side, skipping");
            return true;
        }
        false
    }

    // ============================================
    // LIFECYCLE
    // ============================================

    /// Start the kit.
    ///
    /// Returns a future resolving the installation id. When the id is
    /// non-empty it is stored on the host under `app_instance_id`. The
    /// host either awaits the future or spawns it; the kit does neither.
    pub fn on_kit_create(&self) -> impl Future<Output = Option<String>> + Send + 'static {
        info!(
            kit = KIT_NAME,
            "Kit relies on a functioning instance of Firebase Analytics. If your Firebase Analytics instance is not configured properly, this Kit will not work"
        );

        let request = self.client.app_instance_id();
        let host = Arc::clone(&self.host);

        async move {
            match request.await {
                Ok(instance_id) if !instance_id.is_empty() => {
                    debug!("Storing Firebase app instance id");
                    host.set_integration_attributes(HashMap::from([(
                        INSTANCE_ID_INTEGRATION_KEY.to_string(),
                        instance_id.clone(),
                    )]));
                    Some(instance_id)
                }
                Ok(_) => {
                    debug!("Firebase returned an empty app instance id");
                    None
                }
                Err(_) => {
                    debug!("Firebase app instance id unavailable");
                    None
                }
            }
        }
    }

    // ============================================
    // EVENTS
    // ============================================

    /// Forward a generic event.
    pub fn log_event(&self, event: &MpEvent) -> Vec<ReportingMessage> {
        if self.forwarding_suppressed("log_event") {
            return Vec::new();
        }

        let name = self.firebase_event_name(event);
        if name.is_empty() {
            debug!(event_name = %event.event_name, "Event name standardized to nothing, skipping");
            return Vec::new();
        }

        let bundle = self.attribute_bundle(&event.custom_attributes);
        debug!(event_name = %name, params = bundle.len(), "Logging event");
        self.client.log_event(&name, bundle);

        vec![ReportingMessage::new(MessageType::Event, Some(name))]
    }

    /// Name a generic event is recorded under.
    ///
    /// Search events become `search` and screen events routed through the
    /// event path become `view_item`; anything else is standardized.
    pub fn firebase_event_name(&self, event: &MpEvent) -> String {
        if event.event_type == EventType::Search {
            return event::SEARCH.to_string();
        }
        if event.screen_event {
            return event::VIEW_ITEM.to_string();
        }
        self.standardizer.name(&event.event_name, true)
    }

    fn attribute_bundle(&self, attributes: &HashMap<String, String>) -> Bundle {
        let mut bundle = Bundle::new();
        for (key, value) in self.standardizer.attributes(attributes, true) {
            bundle.insert(key, BundleValue::String(value));
        }
        bundle
    }

    /// Set the current screen.
    ///
    /// Needs a foreground activity from the host; without one nothing is
    /// forwarded. Screen attributes are not forwarded.
    pub fn log_screen(
        &self,
        screen_name: &str,
        _attributes: &HashMap<String, String>,
    ) -> Vec<ReportingMessage> {
        if self.forwarding_suppressed("log_screen") {
            return Vec::new();
        }

        let Some(activity) = self.host.current_activity() else {
            debug!(screen_name, "No current activity, skipping screen");
            return Vec::new();
        };

        let name = self.standardizer.name(screen_name, true);
        debug!(screen = %activity, screen_name = %name, "Setting current screen");
        self.client.set_current_screen(&activity, &name, None);

        vec![ReportingMessage::new(MessageType::ScreenView, Some(name))]
    }

    /// Forward a commerce event as zero or more Firebase events.
    pub fn log_commerce_event(&self, commerce_event: &CommerceEvent) -> Vec<ReportingMessage> {
        if self.forwarding_suppressed("log_commerce_event") {
            return Vec::new();
        }

        let mapping = map_commerce_event(commerce_event, &self.standardizer);
        let Some(name) = mapping.events.first().map(|event| event.name.clone()) else {
            debug!("Commerce event produced nothing to forward");
            return Vec::new();
        };

        for outbound in mapping.events {
            debug!(event_name = %outbound.name, params = outbound.bundle.len(), "Logging commerce event");
            self.client.log_event(&outbound.name, outbound.bundle);
        }

        vec![ReportingMessage::new(MessageType::CommerceEvent, Some(name))]
    }

    // ============================================
    // IDENTITY
    // ============================================

    /// Set the user id, then forward the user's attributes.
    pub fn on_identify_completed(&self, user: &User) {
        if self.forwarding_suppressed("on_identify_completed") {
            return;
        }
        self.set_user_id(user);
        self.forward_user_attributes(&user.attributes);
    }

    /// Set the user id, then forward the user's attributes.
    pub fn on_login_completed(&self, user: &User) {
        if self.forwarding_suppressed("on_login_completed") {
            return;
        }
        self.set_user_id(user);
        self.forward_user_attributes(&user.attributes);
    }

    /// Set the user id, then forward the user's attributes.
    pub fn on_modify_completed(&self, user: &User) {
        if self.forwarding_suppressed("on_modify_completed") {
            return;
        }
        self.set_user_id(user);
        self.forward_user_attributes(&user.attributes);
    }

    pub fn on_logout_completed(&self, user: &User) {
        if self.forwarding_suppressed("on_logout_completed") {
            return;
        }
        self.set_user_id(user);
    }

    pub fn on_user_identified(&self, user: &User) {
        if self.forwarding_suppressed("on_user_identified") {
            return;
        }
        self.set_user_id(user);
    }

    fn set_user_id(&self, user: &User) {
        let selector = self.config.external_identity_type();
        match resolve_user_id(selector, user, self.config.hash_user_id()) {
            Some(user_id) => {
                debug!(mpid = user.mpid, hashed = self.config.hash_user_id(), "Setting user id");
                self.client.set_user_id(&user_id);
            }
            None => debug!(mpid = user.mpid, selector = ?selector, "No user id to forward"),
        }
    }

    // ============================================
    // USER ATTRIBUTES
    // ============================================

    /// Forward a user attribute. Only string values are supported.
    pub fn on_set_user_attribute(&self, key: &str, value: &Value) {
        if self.forwarding_suppressed("on_set_user_attribute") {
            return;
        }
        let Value::String(value) = value else {
            debug!(key, "Ignoring non-string user attribute");
            return;
        };
        self.set_user_property(key, Some(value.as_str()));
    }

    /// Attribute lists are not supported.
    pub fn on_set_user_attribute_list(&self, key: &str, _values: &[String]) {
        debug!(key, "Ignoring user attribute list");
    }

    /// Tags are not supported.
    pub fn on_set_user_tag(&self, key: &str) {
        debug!(key, "Ignoring user tag");
    }

    /// Clear a user property.
    pub fn on_remove_user_attribute(&self, key: &str) {
        if self.forwarding_suppressed("on_remove_user_attribute") {
            return;
        }
        self.set_user_property(key, None);
    }

    /// Forward the attribute's value after an increment.
    pub fn on_increment_user_attribute(&self, key: &str, incremented_by: f64, value: Option<&str>) {
        if self.forwarding_suppressed("on_increment_user_attribute") {
            return;
        }
        debug!(key, incremented_by, "Forwarding incremented user attribute");
        self.set_user_property(key, value);
    }

    /// Forward every string user attribute. Lists are not supported.
    pub fn on_set_all_user_attributes(&self, attributes: &HashMap<String, String>) {
        if self.forwarding_suppressed("on_set_all_user_attributes") {
            return;
        }
        self.forward_user_attributes(attributes);
    }

    fn forward_user_attributes(&self, attributes: &HashMap<String, String>) {
        for (key, value) in self.standardizer.attributes(attributes, false) {
            debug!(key = %key, "Setting user property");
            self.client.set_user_property(&key, Some(&value));
        }
    }

    fn set_user_property(&self, key: &str, value: Option<&str>) {
        let key = self.standardizer.name(key, false);
        if key.is_empty() {
            debug!("User attribute name standardized to nothing, skipping");
            return;
        }
        let value = value.map(|value| self.standardizer.value(value, false));
        debug!(key = %key, cleared = value.is_none(), "Setting user property");
        self.client.set_user_property(&key, value.as_deref());
    }

    // ============================================
    // UNSUPPORTED
    // ============================================

    pub fn set_opt_out(&self, _opt_out: bool) -> Vec<ReportingMessage> {
        Vec::new()
    }

    /// Consent is enforced by the host.
    pub fn on_consent_state_updated(&self, _consent: &HashMap<String, bool>) {}

    pub fn leave_breadcrumb(&self, _breadcrumb: &str) -> Vec<ReportingMessage> {
        Vec::new()
    }

    pub fn log_error(&self, _message: &str, _attributes: &HashMap<String, String>) -> Vec<ReportingMessage> {
        Vec::new()
    }

    pub fn log_exception(
        &self,
        _message: &str,
        _attributes: &HashMap<String, String>,
    ) -> Vec<ReportingMessage> {
        Vec::new()
    }

    pub fn log_ltv_increase(
        &self,
        _amount: f64,
        _total: f64,
        _event_name: &str,
        _attributes: &HashMap<String, String>,
    ) -> Vec<ReportingMessage> {
        Vec::new()
    }
}
