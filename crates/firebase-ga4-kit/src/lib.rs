//! GA4 for Firebase kit.
//!
//! Maps a host analytics pipeline's events, commerce events, identities and
//! user attributes onto the Firebase Analytics surface, enforcing Firebase's
//! naming rules on the way out.
//!
//! # Example
//!
//! ```rust,ignore
//! use firebase_ga4_kit::{
//!     CommerceEventBuilder, Ga4Kit, MemoryClient, MemoryHost, ProductAction, ProductBuilder,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), firebase_ga4_kit::Error> {
//!     let client = MemoryClient::new();
//!     let kit = Ga4Kit::builder(Arc::new(client.clone()), Arc::new(MemoryHost::new()))
//!         .hash_user_id(true)
//!         .build()?;
//!
//!     tokio::spawn(kit.on_kit_create());
//!
//!     let purchase = CommerceEventBuilder::product_action(
//!         ProductAction::Purchase,
//!         ProductBuilder::new("Shoe", "sku_1", 49.99).build(),
//!     )
//!     .currency("EUR")
//!     .build();
//!     kit.log_commerce_event(&purchase);
//!
//!     Ok(())
//! }
//! ```

mod builders;
mod bundle;
mod classify;
mod client;
mod commerce;
mod config;
pub mod constants;
mod error;
mod identity;
mod kit;
mod recorder;
mod standardize;
mod types;

pub use builders::{CommerceEventBuilder, MpEventBuilder, ProductBuilder, UserBuilder};
pub use bundle::{Bundle, BundleValue};
pub use classify::{
    classify, impression_bundle, map_commerce_event, product_action_event, product_bundle,
    promotion_bundle, CheckoutEventType, Classification, CommerceMapping, Notice, OutboundEvent,
};
pub use client::{AnalyticsClient, KitHost};
pub use commerce::{
    CommerceEvent, Impression, Product, ProductAction, Promotion, PromotionAction,
    TransactionAttributes,
};
pub use config::{Config, Ga4KitBuilder};
pub use error::Error;
pub use identity::{fnv1a_32, resolve_user_id, ExternalIdentityType};
pub use kit::Ga4Kit;
pub use recorder::{LoggedEvent, MemoryClient, MemoryHost, ScreenView};
pub use standardize::{standardize_name, standardize_value, NameStandardizer, Standardizer};
pub use types::{EventType, IdentityType, MessageType, MpEvent, ReportingMessage, User};

impl Ga4KitBuilder {
    /// Build the kit.
    pub fn build(self) -> Result<Ga4Kit, Error> {
        let config = self.build_config()?;
        let standardizer = match self.name_standardizer {
            Some(hook) => Standardizer::with_hook(hook),
            None => Standardizer::new(),
        };
        Ok(Ga4Kit::from_parts(self.client, self.host, config, standardizer))
    }
}
