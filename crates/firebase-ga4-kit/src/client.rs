//! Outbound seams: the wrapped analytics SDK and the host framework.

use crate::bundle::Bundle;
use std::collections::HashMap;
use tokio::sync::oneshot;

/// The analytics SDK the kit forwards to.
///
/// Implementations are held behind an `Arc` and may be called from any
/// thread.
pub trait AnalyticsClient: Send + Sync {
    /// Record a named event with its parameters.
    fn log_event(&self, name: &str, bundle: Bundle);

    /// Set the current screen. `screen` is the host's current activity.
    fn set_current_screen(&self, screen: &str, screen_name: &str, class_override: Option<&str>);

    fn set_user_id(&self, user_id: &str);

    /// Set a user property; `None` clears it.
    fn set_user_property(&self, key: &str, value: Option<&str>);

    /// Request the installation id. The sender side is completed at most once;
    /// dropping it signals that no id is available.
    fn app_instance_id(&self) -> oneshot::Receiver<String>;
}

/// The kit-management framework hosting the kit.
pub trait KitHost: Send + Sync {
    /// Name of the screen currently in the foreground, if any.
    fn current_activity(&self) -> Option<String>;

    /// Store integration attributes reported alongside the host's uploads.
    fn set_integration_attributes(&self, attributes: HashMap<String, String>);
}
