//! Inbound commerce event model.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Product action carried by a commerce event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductAction {
    AddToCart,
    RemoveFromCart,
    AddToWishlist,
    RemoveFromWishlist,
    Checkout,
    CheckoutOption,
    Click,
    #[serde(rename = "view_detail")]
    Detail,
    Purchase,
    Refund,
}

impl ProductAction {
    /// Every product action the host can send.
    pub const ALL: [ProductAction; 10] = [
        ProductAction::AddToCart,
        ProductAction::RemoveFromCart,
        ProductAction::AddToWishlist,
        ProductAction::RemoveFromWishlist,
        ProductAction::Checkout,
        ProductAction::CheckoutOption,
        ProductAction::Click,
        ProductAction::Detail,
        ProductAction::Purchase,
        ProductAction::Refund,
    ];
}

/// Promotion action carried by a commerce event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionAction {
    Click,
    View,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub unit_price: f64,
    pub quantity: f64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: Option<String>,
    pub name: Option<String>,
    pub creative: Option<String>,
    pub position: Option<String>,
}

/// A named list of products the user was shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impression {
    pub list_name: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAttributes {
    pub id: Option<String>,
    pub affiliation: Option<String>,
    pub revenue: Option<f64>,
    pub tax: Option<f64>,
    pub shipping: Option<f64>,
    pub coupon_code: Option<String>,
}

/// A commerce event as delivered by the host.
///
/// Exactly one of the promotion, impression and product-action shapes
/// is expected to be populated; when several are, promotions win over
/// impressions and impressions win over the product action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommerceEvent {
    pub product_action: Option<ProductAction>,
    pub promotion_action: Option<PromotionAction>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub impressions: Vec<Impression>,
    pub transaction_attributes: Option<TransactionAttributes>,
    pub currency: Option<String>,
    /// Deprecated free-form checkout options.
    pub checkout_options: Option<String>,
    pub checkout_step: Option<i32>,
    #[serde(default)]
    pub custom_flags: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub custom_attributes: HashMap<String, String>,
}

impl CommerceEvent {
    /// First value of a custom flag, if the flag is present and non-empty.
    pub fn custom_flag(&self, key: &str) -> Option<&str> {
        self.custom_flags
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
