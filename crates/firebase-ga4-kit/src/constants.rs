//! Firebase event names, parameter keys and naming limits.

/// Name reported for this kit.
pub const KIT_NAME: &str = "GA4 for Firebase";

/// Integration attribute key under which the app instance id is stored.
pub const INSTANCE_ID_INTEGRATION_KEY: &str = "app_instance_id";

/// Prefixes reserved by Firebase, checked in this order.
pub const FORBIDDEN_PREFIXES: [&str; 3] = ["google_", "firebase_", "ga_"];

/// Maximum length of an event name or event parameter key.
pub const EVENT_NAME_MAX_LENGTH: usize = 40;

/// Maximum length of a user property name.
pub const USER_ATTRIBUTE_NAME_MAX_LENGTH: usize = 24;

/// Maximum length of an event parameter value.
pub const EVENT_VALUE_MAX_LENGTH: usize = 100;

/// Maximum length of a user property value.
pub const USER_ATTRIBUTE_VALUE_MAX_LENGTH: usize = 36;

/// Maximum number of custom parameters forwarded with one event.
pub const EVENT_MAX_PARAMETERS: usize = 100;

/// Currency used when a commerce event does not carry one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Custom flag selecting the GA4 event for a checkout-option action.
pub const CF_COMMERCE_EVENT_TYPE: &str = "GA4.CommerceEventType";

/// Custom flag carrying the payment type of `add_payment_info`.
pub const CF_PAYMENT_TYPE: &str = "GA4.PaymentType";

/// Custom flag carrying the shipping tier of `add_shipping_info`.
pub const CF_SHIPPING_TIER: &str = "GA4.ShippingTier";

/// Firebase event names.
pub mod event {
    pub const ADD_PAYMENT_INFO: &str = "add_payment_info";
    pub const ADD_SHIPPING_INFO: &str = "add_shipping_info";
    pub const ADD_TO_CART: &str = "add_to_cart";
    pub const ADD_TO_WISHLIST: &str = "add_to_wishlist";
    pub const BEGIN_CHECKOUT: &str = "begin_checkout";
    pub const CHECKOUT_PROGRESS: &str = "checkout_progress";
    pub const PURCHASE: &str = "purchase";
    pub const REFUND: &str = "refund";
    pub const REMOVE_FROM_CART: &str = "remove_from_cart";
    pub const SEARCH: &str = "search";
    pub const SELECT_ITEM: &str = "select_item";
    pub const SELECT_PROMOTION: &str = "select_promotion";
    pub const SET_CHECKOUT_OPTION: &str = "set_checkout_option";
    pub const VIEW_ITEM: &str = "view_item";
    pub const VIEW_ITEM_LIST: &str = "view_item_list";
    pub const VIEW_PROMOTION: &str = "view_promotion";
}

/// Firebase event parameter keys.
pub mod param {
    pub const COUPON: &str = "coupon";
    pub const CREATIVE_NAME: &str = "creative_name";
    pub const CREATIVE_SLOT: &str = "creative_slot";
    pub const CURRENCY: &str = "currency";
    pub const ITEM_CATEGORY: &str = "item_category";
    pub const ITEM_ID: &str = "item_id";
    pub const ITEM_LIST_ID: &str = "item_list_id";
    pub const ITEM_LIST_NAME: &str = "item_list_name";
    pub const ITEM_NAME: &str = "item_name";
    pub const ITEMS: &str = "items";
    pub const PAYMENT_TYPE: &str = "payment_type";
    pub const PRICE: &str = "price";
    pub const PROMOTION_ID: &str = "promotion_id";
    pub const PROMOTION_NAME: &str = "promotion_name";
    pub const QUANTITY: &str = "quantity";
    pub const SHIPPING: &str = "shipping";
    pub const SHIPPING_TIER: &str = "shipping_tier";
    pub const TAX: &str = "tax";
    pub const TRANSACTION_ID: &str = "transaction_id";
    pub const VALUE: &str = "value";
}

/// Keys read from the host-delivered kit settings.
pub mod setting {
    pub const HASH_USER_ID: &str = "hashUserId";
    pub const FORWARD_REQUESTS_SERVER_SIDE: &str = "forwardWebRequestsServerSide";
    pub const EXTERNAL_USER_IDENTITY_TYPE: &str = "externalUserIdentityType";
}
