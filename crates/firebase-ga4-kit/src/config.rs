//! Kit configuration.

use crate::client::{AnalyticsClient, KitHost};
use crate::constants::setting;
use crate::identity::ExternalIdentityType;
use crate::standardize::NameStandardizer;
use crate::Error;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Kit configuration, read-only for the kit's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub(crate) hash_user_id: bool,
    pub(crate) forward_requests_server_side: bool,
    pub(crate) external_identity_type: Option<ExternalIdentityType>,
}

impl Config {
    /// Parse host settings.
    ///
    /// Boolean settings are true only when the value is `"true"`, ignoring
    /// case. An unknown identity type is logged and treated as absent.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let flag = |key: &str| {
            settings
                .get(key)
                .is_some_and(|value| value.eq_ignore_ascii_case("true"))
        };

        let external_identity_type = settings
            .get(setting::EXTERNAL_USER_IDENTITY_TYPE)
            .and_then(|value| match value.parse::<ExternalIdentityType>() {
                Ok(identity_type) => Some(identity_type),
                Err(e) => {
                    warn!(value = %value, error = %e, "Ignoring external user identity type");
                    None
                }
            });

        Self {
            hash_user_id: flag(setting::HASH_USER_ID),
            forward_requests_server_side: flag(setting::FORWARD_REQUESTS_SERVER_SIDE),
            external_identity_type,
        }
    }

    /// Parse host settings delivered as a JSON object.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(Self::from_settings(&settings_from_json(json)?))
    }

    /// Whether user ids are hashed before forwarding.
    pub fn hash_user_id(&self) -> bool {
        self.hash_user_id
    }

    /// Whether the host forwards server side, making the kit a no-op.
    pub fn forward_requests_server_side(&self) -> bool {
        self.forward_requests_server_side
    }

    /// Which identity becomes the user id, if any.
    pub fn external_identity_type(&self) -> Option<ExternalIdentityType> {
        self.external_identity_type
    }
}

/// Flatten a JSON settings object into the string map hosts deliver.
///
/// Booleans and numbers are stringified and nulls are skipped.
fn settings_from_json(json: &str) -> Result<HashMap<String, String>, Error> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(object) = value else {
        return Err(Error::Config("settings must be a JSON object".into()));
    };

    let mut settings = HashMap::with_capacity(object.len());
    for (key, value) in object {
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::Config(format!("setting {key} must be a scalar")));
            }
        };
        settings.insert(key, value);
    }
    Ok(settings)
}

/// Builder for [`Ga4Kit`](crate::Ga4Kit).
pub struct Ga4KitBuilder {
    pub(crate) client: Arc<dyn AnalyticsClient>,
    pub(crate) host: Arc<dyn KitHost>,
    settings: HashMap<String, String>,
    settings_json: Option<String>,
    hash_user_id: Option<bool>,
    forward_requests_server_side: Option<bool>,
    external_identity_type: Option<ExternalIdentityType>,
    pub(crate) name_standardizer: Option<Arc<dyn NameStandardizer>>,
}

impl fmt::Debug for Ga4KitBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ga4KitBuilder")
            .field("settings", &self.settings)
            .field("settings_json", &self.settings_json)
            .field("hash_user_id", &self.hash_user_id)
            .field("forward_requests_server_side", &self.forward_requests_server_side)
            .field("external_identity_type", &self.external_identity_type)
            .field("name_standardizer", &self.name_standardizer.is_some())
            .finish_non_exhaustive()
    }
}

impl Ga4KitBuilder {
    /// Create a new builder around the wrapped client and the host.
    pub fn new(client: Arc<dyn AnalyticsClient>, host: Arc<dyn KitHost>) -> Self {
        Self {
            client,
            host,
            settings: HashMap::new(),
            settings_json: None,
            hash_user_id: None,
            forward_requests_server_side: None,
            external_identity_type: None,
            name_standardizer: None,
        }
    }

    /// Use the host's settings map. Replaces earlier settings.
    pub fn settings(mut self, settings: HashMap<String, String>) -> Self {
        self.settings = settings;
        self
    }

    /// Use settings delivered as a JSON object. Entries override the settings map.
    pub fn settings_json(mut self, json: impl Into<String>) -> Self {
        self.settings_json = Some(json.into());
        self
    }

    pub fn hash_user_id(mut self, hash: bool) -> Self {
        self.hash_user_id = Some(hash);
        self
    }

    pub fn forward_requests_server_side(mut self, enabled: bool) -> Self {
        self.forward_requests_server_side = Some(enabled);
        self
    }

    pub fn external_identity_type(mut self, identity_type: ExternalIdentityType) -> Self {
        self.external_identity_type = Some(identity_type);
        self
    }

    /// Rewrite every raw name before the built-in standardization rules.
    pub fn name_standardizer(mut self, hook: impl NameStandardizer + 'static) -> Self {
        self.name_standardizer = Some(Arc::new(hook));
        self
    }

    /// Build the configuration. Explicit setters win over settings.
    pub(crate) fn build_config(&self) -> Result<Config, Error> {
        let mut settings = self.settings.clone();
        if let Some(json) = &self.settings_json {
            settings.extend(settings_from_json(json)?);
        }

        let mut config = Config::from_settings(&settings);
        if let Some(hash) = self.hash_user_id {
            config.hash_user_id = hash;
        }
        if let Some(enabled) = self.forward_requests_server_side {
            config.forward_requests_server_side = enabled;
        }
        if let Some(identity_type) = self.external_identity_type {
            config.external_identity_type = Some(identity_type);
        }
        Ok(config)
    }
}
