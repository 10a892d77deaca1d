//! Commerce event classification and bundle construction.
//!
//! A commerce event maps onto zero or more Firebase events:
//!
//! - a promotion action yields one `select_promotion` / `view_promotion` per promotion
//! - otherwise impressions yield one `view_item_list` per impression
//! - otherwise a product action yields a single event named after the action
//!
//! Checkout-option actions are disambiguated by the `GA4.CommerceEventType`
//! custom flag and fall back to the deprecated `set_checkout_option` event.

use crate::bundle::Bundle;
use crate::commerce::{CommerceEvent, Impression, Product, ProductAction, Promotion, PromotionAction};
use crate::constants::{
    event, param, CF_COMMERCE_EVENT_TYPE, CF_PAYMENT_TYPE, CF_SHIPPING_TIER, DEFAULT_CURRENCY,
};
use crate::standardize::Standardizer;
use tracing::{info, warn};

/// GA4 event selected by the `GA4.CommerceEventType` custom flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEventType {
    AddShippingInfo,
    AddPaymentInfo,
}

impl CheckoutEventType {
    /// Parse a flag value. Only exact event names are recognized.
    pub fn from_flag(value: &str) -> Option<Self> {
        match value {
            event::ADD_SHIPPING_INFO => Some(Self::AddShippingInfo),
            event::ADD_PAYMENT_INFO => Some(Self::AddPaymentInfo),
            _ => None,
        }
    }

    pub fn event_name(self) -> &'static str {
        match self {
            Self::AddShippingInfo => event::ADD_SHIPPING_INFO,
            Self::AddPaymentInfo => event::ADD_PAYMENT_INFO,
        }
    }

    /// Custom flag holding this event's extra parameter.
    pub fn flag_key(self) -> &'static str {
        match self {
            Self::AddShippingInfo => CF_SHIPPING_TIER,
            Self::AddPaymentInfo => CF_PAYMENT_TYPE,
        }
    }

    /// Bundle key of this event's extra parameter.
    pub fn param_key(self) -> &'static str {
        match self {
            Self::AddShippingInfo => param::SHIPPING_TIER,
            Self::AddPaymentInfo => param::PAYMENT_TYPE,
        }
    }
}

/// How a commerce event is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// One event per promotion, all with this name.
    Promotion { event_name: &'static str },
    /// One `view_item_list` event per impression.
    ItemList,
    /// A single product-action event.
    Product {
        event_name: &'static str,
        checkout: Option<CheckoutEventType>,
    },
    /// Checkout option without a recognized `GA4.CommerceEventType`.
    DeprecatedCheckoutOption,
    /// Nothing is forwarded.
    Unhandled,
}

impl Classification {
    /// Event name used for every outbound event, if any.
    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            Self::Promotion { event_name } | Self::Product { event_name, .. } => Some(*event_name),
            Self::ItemList => Some(event::VIEW_ITEM_LIST),
            Self::DeprecatedCheckoutOption => Some(event::SET_CHECKOUT_OPTION),
            Self::Unhandled => None,
        }
    }
}

/// Non-fatal condition raised while mapping a commerce event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The event carried no currency; `USD` was used.
    CurrencyDefaulted,
    /// A checkout option was sent as the deprecated `set_checkout_option`.
    DeprecatedCheckoutOption,
}

/// One event ready for [`AnalyticsClient::log_event`](crate::AnalyticsClient::log_event).
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub name: String,
    pub bundle: Bundle,
}

/// Result of mapping one commerce event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommerceMapping {
    pub events: Vec<OutboundEvent>,
    pub notices: Vec<Notice>,
}

/// Target event for a product action, `None` when the action is not forwarded.
///
/// Checkout options need their custom flags and are resolved by [`classify`].
pub fn product_action_event(action: ProductAction) -> Option<&'static str> {
    match action {
        ProductAction::AddToCart => Some(event::ADD_TO_CART),
        ProductAction::AddToWishlist => Some(event::ADD_TO_WISHLIST),
        ProductAction::Checkout => Some(event::BEGIN_CHECKOUT),
        ProductAction::Purchase => Some(event::PURCHASE),
        ProductAction::Refund => Some(event::REFUND),
        ProductAction::RemoveFromCart => Some(event::REMOVE_FROM_CART),
        ProductAction::Click => Some(event::SELECT_ITEM),
        ProductAction::Detail => Some(event::VIEW_ITEM),
        ProductAction::CheckoutOption | ProductAction::RemoveFromWishlist => None,
    }
}

/// Decide how a commerce event is forwarded. First match wins.
pub fn classify(event: &CommerceEvent) -> Classification {
    if let Some(action) = event.promotion_action {
        let event_name = match action {
            PromotionAction::Click => event::SELECT_PROMOTION,
            PromotionAction::View => event::VIEW_PROMOTION,
        };
        return Classification::Promotion { event_name };
    }

    if !event.impressions.is_empty() {
        return Classification::ItemList;
    }

    match event.product_action {
        Some(ProductAction::CheckoutOption) => {
            match event
                .custom_flag(CF_COMMERCE_EVENT_TYPE)
                .and_then(CheckoutEventType::from_flag)
            {
                Some(checkout) => Classification::Product {
                    event_name: checkout.event_name(),
                    checkout: Some(checkout),
                },
                None => Classification::DeprecatedCheckoutOption,
            }
        }
        Some(action) => match product_action_event(action) {
            Some(event_name) => Classification::Product {
                event_name,
                checkout: None,
            },
            None => Classification::Unhandled,
        },
        None => Classification::Unhandled,
    }
}

/// Classify a commerce event and build every outbound event for it.
pub fn map_commerce_event(event: &CommerceEvent, standardizer: &Standardizer) -> CommerceMapping {
    let mut mapping = CommerceMapping::default();

    match classify(event) {
        Classification::Promotion { event_name } => {
            mapping.events = event
                .promotions
                .iter()
                .map(|promotion| OutboundEvent {
                    name: event_name.to_string(),
                    bundle: promotion_bundle(promotion),
                })
                .collect();
        }
        Classification::ItemList => {
            mapping.events = event
                .impressions
                .iter()
                .map(|impression| OutboundEvent {
                    name: event::VIEW_ITEM_LIST.to_string(),
                    bundle: impression_bundle(impression),
                })
                .collect();
        }
        Classification::Product {
            event_name,
            checkout,
        } => {
            let bundle = commerce_event_bundle(event, checkout, standardizer, &mut mapping.notices);
            mapping.events.push(OutboundEvent {
                name: event_name.to_string(),
                bundle,
            });
        }
        Classification::DeprecatedCheckoutOption => {
            warn!(
                flag = CF_COMMERCE_EVENT_TYPE,
                "GA4 no longer supports CHECKOUT_OPTION; add a valid GA4.CommerceEventType custom flag. Sending deprecated set_checkout_option"
            );
            mapping.notices.push(Notice::DeprecatedCheckoutOption);
            let bundle = commerce_event_bundle(event, None, standardizer, &mut mapping.notices);
            mapping.events.push(OutboundEvent {
                name: event::SET_CHECKOUT_OPTION.to_string(),
                bundle,
            });
        }
        Classification::Unhandled => {}
    }

    mapping
}

pub fn promotion_bundle(promotion: &Promotion) -> Bundle {
    Bundle::new()
        .put_string(param::PROMOTION_ID, promotion.id.as_deref())
        .put_string(param::CREATIVE_NAME, promotion.creative.as_deref())
        .put_string(param::PROMOTION_NAME, promotion.name.as_deref())
        .put_string(param::CREATIVE_SLOT, promotion.position.as_deref())
}

/// The list name doubles as the list id.
pub fn impression_bundle(impression: &Impression) -> Bundle {
    Bundle::new()
        .put_string(param::ITEM_LIST_ID, impression.list_name.as_deref())
        .put_string(param::ITEM_LIST_NAME, impression.list_name.as_deref())
        .put_bundle_list(param::ITEMS, product_bundles(&impression.products))
}

pub fn product_bundle(product: &Product) -> Bundle {
    Bundle::new()
        .put_long(param::QUANTITY, Some(product.quantity as i64))
        .put_string(param::ITEM_ID, product.sku.as_deref())
        .put_string(param::ITEM_NAME, product.name.as_deref())
        .put_string(param::ITEM_CATEGORY, product.category.as_deref())
        .put_double(param::PRICE, Some(product.unit_price))
}

fn product_bundles(products: &[Product]) -> Vec<Bundle> {
    products.iter().map(product_bundle).collect()
}

fn transaction_bundle(event: &CommerceEvent) -> Bundle {
    match &event.transaction_attributes {
        Some(attributes) => Bundle::new()
            .put_string(param::TRANSACTION_ID, attributes.id.as_deref())
            .put_double(param::VALUE, attributes.revenue)
            .put_double(param::TAX, attributes.tax)
            .put_double(param::SHIPPING, attributes.shipping)
            .put_string(param::COUPON, attributes.coupon_code.as_deref()),
        None => Bundle::new(),
    }
}

fn commerce_event_bundle(
    event: &CommerceEvent,
    checkout: Option<CheckoutEventType>,
    standardizer: &Standardizer,
    notices: &mut Vec<Notice>,
) -> Bundle {
    let mut bundle = transaction_bundle(event);

    if let Some(checkout) = checkout {
        bundle = bundle.put_string(checkout.param_key(), event.custom_flag(checkout.flag_key()));
    }

    for (key, value) in standardizer.attributes(&event.custom_attributes, true) {
        bundle = bundle.put_string(&key, Some(value.as_str()));
    }

    let currency = match event.currency.as_deref() {
        Some(currency) => currency,
        None => {
            info!(
                currency = DEFAULT_CURRENCY,
                "currency field required by Firebase was not set, defaulting to USD"
            );
            notices.push(Notice::CurrencyDefaulted);
            DEFAULT_CURRENCY
        }
    };

    bundle
        .put_string(param::CURRENCY, Some(currency))
        .put_bundle_list(param::ITEMS, product_bundles(&event.products))
        .put_string(event::SET_CHECKOUT_OPTION, event.checkout_options.as_deref())
        .put_int(event::CHECKOUT_PROGRESS, event.checkout_step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{CommerceEventBuilder, ProductBuilder};
    use crate::commerce::TransactionAttributes;

    fn product() -> Product {
        ProductBuilder::new("asdv", "asdv", 1.3).build()
    }

    fn map(event: &CommerceEvent) -> CommerceMapping {
        map_commerce_event(event, &Standardizer::new())
    }

    #[test]
    fn test_product_action_table() {
        let expected = [
            (ProductAction::AddToCart, Some("add_to_cart")),
            (ProductAction::AddToWishlist, Some("add_to_wishlist")),
            (ProductAction::Checkout, Some("begin_checkout")),
            (ProductAction::Purchase, Some("purchase")),
            (ProductAction::Refund, Some("refund")),
            (ProductAction::RemoveFromCart, Some("remove_from_cart")),
            (ProductAction::Click, Some("select_item")),
            (ProductAction::Detail, Some("view_item")),
            (ProductAction::RemoveFromWishlist, None),
            (ProductAction::CheckoutOption, None),
        ];
        for (action, name) in expected {
            assert_eq!(product_action_event(action), name, "action: {action:?}");
        }
    }

    #[test]
    fn test_shipping_info() {
        let event = CommerceEventBuilder::product_action(ProductAction::CheckoutOption, product())
            .custom_flag(CF_COMMERCE_EVENT_TYPE, "add_shipping_info")
            .custom_flag(CF_SHIPPING_TIER, "overnight")
            .build();

        let mapping = map(&event);

        assert_eq!(mapping.events.len(), 1);
        assert_eq!(mapping.events[0].name, "add_shipping_info");
        assert_eq!(mapping.events[0].bundle.get_string("shipping_tier"), Some("overnight"));
        assert!(!mapping.events[0].bundle.contains_key("payment_type"));
    }

    #[test]
    fn test_payment_info() {
        let event = CommerceEventBuilder::product_action(ProductAction::CheckoutOption, product())
            .custom_flag(CF_COMMERCE_EVENT_TYPE, "add_payment_info")
            .custom_flag(CF_PAYMENT_TYPE, "visa")
            .build();

        let mapping = map(&event);

        assert_eq!(mapping.events.len(), 1);
        assert_eq!(mapping.events[0].name, "add_payment_info");
        assert_eq!(mapping.events[0].bundle.get_string("payment_type"), Some("visa"));
    }

    #[test]
    fn test_checkout_event_type_without_extra_param() {
        let event = CommerceEventBuilder::product_action(ProductAction::CheckoutOption, product())
            .custom_flag(CF_COMMERCE_EVENT_TYPE, "add_payment_info")
            .build();

        let mapping = map(&event);

        assert_eq!(mapping.events[0].name, "add_payment_info");
        assert!(!mapping.events[0].bundle.contains_key("payment_type"));
        assert!(!mapping.notices.contains(&Notice::DeprecatedCheckoutOption));
    }

    #[test]
    fn test_checkout_option_fallbacks() {
        let missing = CommerceEventBuilder::product_action(ProductAction::CheckoutOption, product()).build();
        let mut empty = missing.clone();
        empty
            .custom_flags
            .insert(CF_COMMERCE_EVENT_TYPE.to_string(), vec![]);
        let unknown = CommerceEventBuilder::product_action(ProductAction::CheckoutOption, product())
            .custom_flag(CF_COMMERCE_EVENT_TYPE, "ADD_SHIPPING_INFO")
            .build();

        for event in [missing, empty, unknown] {
            assert_eq!(classify(&event), Classification::DeprecatedCheckoutOption);
            let mapping = map(&event);
            assert_eq!(mapping.events.len(), 1);
            assert_eq!(mapping.events[0].name, "set_checkout_option");
            assert!(mapping.notices.contains(&Notice::DeprecatedCheckoutOption));
        }
    }

    #[test]
    fn test_shipping_tier_ignored_outside_checkout_option() {
        let event = CommerceEventBuilder::product_action(ProductAction::Purchase, product())
            .custom_flag(CF_COMMERCE_EVENT_TYPE, "add_shipping_info")
            .custom_flag(CF_SHIPPING_TIER, "overnight")
            .build();

        let mapping = map(&event);

        assert_eq!(mapping.events[0].name, "purchase");
        assert!(!mapping.events[0].bundle.contains_key("shipping_tier"));
    }

    #[test]
    fn test_currency_defaults_to_usd() {
        let event = CommerceEventBuilder::product_action(ProductAction::Purchase, product()).build();

        let mapping = map(&event);

        assert_eq!(mapping.events[0].bundle.get_string("currency"), Some("USD"));
        assert_eq!(mapping.notices, vec![Notice::CurrencyDefaulted]);
    }

    #[test]
    fn test_currency_kept_when_set() {
        let event = CommerceEventBuilder::product_action(ProductAction::Purchase, product())
            .currency("EUR")
            .build();

        let mapping = map(&event);

        assert_eq!(mapping.events[0].bundle.get_string("currency"), Some("EUR"));
        assert!(mapping.notices.is_empty());
    }

    #[test]
    fn test_promotion_click_one_event_per_promotion() {
        let promotion = |id: &str| Promotion {
            id: Some(id.into()),
            name: Some("Summer".into()),
            creative: Some("banner".into()),
            position: Some("2".into()),
        };
        let event = CommerceEventBuilder::promotion_action(PromotionAction::Click, promotion("p1"))
            .add_promotion(promotion("p2"))
            .add_promotion(promotion("p3"))
            .build();

        let mapping = map(&event);

        assert_eq!(mapping.events.len(), 3);
        assert!(mapping.events.iter().all(|e| e.name == "select_promotion"));
        let ids: Vec<_> = mapping
            .events
            .iter()
            .map(|e| e.bundle.get_string("promotion_id").unwrap())
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        let first = &mapping.events[0].bundle;
        assert_eq!(first.get_string("creative_name"), Some("banner"));
        assert_eq!(first.get_string("promotion_name"), Some("Summer"));
        assert_eq!(first.get_string("creative_slot"), Some("2"));
    }

    #[test]
    fn test_promotion_view() {
        let event = CommerceEventBuilder::promotion_action(PromotionAction::View, Promotion::default()).build();

        let mapping = map(&event);

        assert_eq!(mapping.events.len(), 1);
        assert_eq!(mapping.events[0].name, "view_promotion");
        assert!(mapping.events[0].bundle.is_empty());
    }

    #[test]
    fn test_promotion_wins_over_product_action() {
        let mut event = CommerceEventBuilder::product_action(ProductAction::Purchase, product()).build();
        event.promotion_action = Some(PromotionAction::View);
        event.promotions.push(Promotion::default());

        assert_eq!(
            classify(&event),
            Classification::Promotion {
                event_name: "view_promotion"
            }
        );
    }

    #[test]
    fn test_impressions() {
        let event = CommerceEventBuilder::impression(Impression {
            list_name: Some("search results".into()),
            products: vec![product(), product()],
        })
        .add_impression(Impression {
            list_name: Some("related".into()),
            products: vec![],
        })
        .build();

        let mapping = map(&event);

        assert_eq!(mapping.events.len(), 2);
        let first = &mapping.events[0];
        assert_eq!(first.name, "view_item_list");
        assert_eq!(first.bundle.get_string("item_list_id"), Some("search results"));
        assert_eq!(first.bundle.get_string("item_list_name"), Some("search results"));
        assert_eq!(first.bundle.get_bundle_list("items").unwrap().len(), 2);
        assert!(!mapping.events[1].bundle.contains_key("items"));
    }

    #[test]
    fn test_unhandled_events_produce_nothing() {
        let wishlist =
            CommerceEventBuilder::product_action(ProductAction::RemoveFromWishlist, product()).build();
        let empty = CommerceEvent::default();

        for event in [wishlist, empty] {
            assert_eq!(classify(&event), Classification::Unhandled);
            assert_eq!(map(&event), CommerceMapping::default());
        }
    }

    #[test]
    fn test_product_action_bundle() {
        let event = CommerceEventBuilder::product_action(
            ProductAction::Purchase,
            ProductBuilder::new("Shoe", "sku_1", 9.5)
                .quantity(2.0)
                .category("footwear")
                .build(),
        )
        .transaction_attributes(TransactionAttributes {
            id: Some("235".into()),
            affiliation: Some("231".into()),
            revenue: Some(23.3),
            tax: Some(0.0),
            shipping: None,
            coupon_code: None,
        })
        .currency("EUR")
        .checkout_options("express")
        .checkout_step(3)
        .build();

        let bundle = &map(&event).events[0].bundle;

        assert_eq!(
            bundle.keys().collect::<Vec<_>>(),
            vec![
                "transaction_id",
                "value",
                "tax",
                "currency",
                "items",
                "set_checkout_option",
                "checkout_progress"
            ]
        );
        assert_eq!(bundle.get_double("value"), Some(23.3));
        assert_eq!(bundle.get_double("tax"), Some(0.0));
        assert_eq!(bundle.get_int("checkout_progress"), Some(3));

        let item = &bundle.get_bundle_list("items").unwrap()[0];
        assert_eq!(item.get_long("quantity"), Some(2));
        assert_eq!(item.get_string("item_id"), Some("sku_1"));
        assert_eq!(item.get_string("item_name"), Some("Shoe"));
        assert_eq!(item.get_string("item_category"), Some("footwear"));
        assert_eq!(item.get_double("price"), Some(9.5));
    }

    #[test]
    fn test_custom_attributes_standardized_into_bundle() {
        let event = CommerceEventBuilder::product_action(ProductAction::AddToCart, product())
            .custom_attribute("google_promo code", "SUMMER")
            .custom_attribute("currency", "ignored")
            .currency("GBP")
            .build();

        let bundle = &map(&event).events[0].bundle;

        assert_eq!(bundle.get_string("promo_code"), Some("SUMMER"));
        assert_eq!(bundle.get_string("currency"), Some("GBP"));
    }
}
