//! Builders for the inbound event model.

use crate::commerce::{
    CommerceEvent, Impression, Product, ProductAction, Promotion, PromotionAction,
    TransactionAttributes,
};
use crate::types::{EventType, IdentityType, MpEvent, User};
use std::collections::HashMap;

// ============================================
// GENERIC EVENT BUILDER
// ============================================

/// Builder for generic events.
#[derive(Debug)]
pub struct MpEventBuilder {
    event_name: String,
    event_type: EventType,
    custom_attributes: HashMap<String, String>,
    screen_event: bool,
}

impl MpEventBuilder {
    pub fn new(event_name: impl Into<String>, event_type: EventType) -> Self {
        Self {
            event_name: event_name.into(),
            event_type,
            custom_attributes: HashMap::new(),
            screen_event: false,
        }
    }

    /// Add a custom attribute.
    pub fn custom_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attributes.insert(key.into(), value.into());
        self
    }

    /// Mark the event as a screen view.
    pub fn screen_event(mut self, screen_event: bool) -> Self {
        self.screen_event = screen_event;
        self
    }

    pub fn build(self) -> MpEvent {
        MpEvent {
            event_name: self.event_name,
            event_type: self.event_type,
            custom_attributes: self.custom_attributes,
            screen_event: self.screen_event,
        }
    }
}

// ============================================
// PRODUCT BUILDER
// ============================================

/// Builder for products. Quantity defaults to 1.
#[derive(Debug)]
pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, unit_price: f64) -> Self {
        Self {
            product: Product {
                name: Some(name.into()),
                sku: Some(sku.into()),
                unit_price,
                quantity: 1.0,
                category: None,
            },
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.product.quantity = quantity;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.product.category = Some(category.into());
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}

// ============================================
// COMMERCE EVENT BUILDER
// ============================================

/// Builder for commerce events.
#[derive(Debug)]
pub struct CommerceEventBuilder {
    event: CommerceEvent,
}

impl CommerceEventBuilder {
    /// Start a product-action event with its first product.
    pub fn product_action(action: ProductAction, product: Product) -> Self {
        Self {
            event: CommerceEvent {
                product_action: Some(action),
                products: vec![product],
                ..CommerceEvent::default()
            },
        }
    }

    /// Start a promotion event with its first promotion.
    pub fn promotion_action(action: PromotionAction, promotion: Promotion) -> Self {
        Self {
            event: CommerceEvent {
                promotion_action: Some(action),
                promotions: vec![promotion],
                ..CommerceEvent::default()
            },
        }
    }

    /// Start an impression event with its first impression.
    pub fn impression(impression: Impression) -> Self {
        Self {
            event: CommerceEvent {
                impressions: vec![impression],
                ..CommerceEvent::default()
            },
        }
    }

    pub fn add_product(mut self, product: Product) -> Self {
        self.event.products.push(product);
        self
    }

    pub fn add_promotion(mut self, promotion: Promotion) -> Self {
        self.event.promotions.push(promotion);
        self
    }

    pub fn add_impression(mut self, impression: Impression) -> Self {
        self.event.impressions.push(impression);
        self
    }

    pub fn transaction_attributes(mut self, attributes: TransactionAttributes) -> Self {
        self.event.transaction_attributes = Some(attributes);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.event.currency = Some(currency.into());
        self
    }

    pub fn checkout_options(mut self, options: impl Into<String>) -> Self {
        self.event.checkout_options = Some(options.into());
        self
    }

    pub fn checkout_step(mut self, step: i32) -> Self {
        self.event.checkout_step = Some(step);
        self
    }

    /// Append a value to a custom flag.
    pub fn custom_flag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.event
            .custom_flags
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn custom_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.event
            .custom_attributes
            .insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> CommerceEvent {
        self.event
    }
}

// ============================================
// USER BUILDER
// ============================================

/// Builder for users.
#[derive(Debug)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    pub fn new(mpid: i64) -> Self {
        Self {
            user: User::new(mpid),
        }
    }

    pub fn identity(mut self, identity_type: IdentityType, value: impl Into<String>) -> Self {
        self.user.identities.insert(identity_type, value.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user.attributes.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> User {
        self.user
    }
}
