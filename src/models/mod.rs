//! Shapes handed to callers: joined views, stats, mutation payloads.

pub mod category;
pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod review;
pub mod setting;
pub mod shipping;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

pub use category::{Category, CategoryPatch, CategoryRef, CategoryStats, NewCategory};
pub use customer::{Customer, CustomerPatch, CustomerRef, CustomerStats, CustomerTotals};
pub use order::{Order, OrderStats, OrderUpdate};
pub use product::{NewProduct, Product, ProductPatch, ProductRef, ProductStats};
pub use report::{DashboardOverview, DateRange, SalesReport};
pub use review::{Review, ReviewStats};
pub use setting::Setting;
pub use shipping::{
    NewShippingMethod, NewShippingZone, ShippingMethodPatch, ShippingZone, ShippingZonePatch,
};

pub static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern compiles"));

/// At least one non-whitespace character.
pub static NOT_BLANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S").expect("not-blank pattern compiles"));

/// Outcome of an administrative mutation, as returned to the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            error
        };
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Distinguishes an absent field from an explicit `null` in patch payloads.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Flattens `validator` errors into one line.
pub(crate) fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: invalid value ({})", error.code),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn slug_pattern() {
        assert!(SLUG_PATTERN.is_match("granola-artesanal"));
        assert!(SLUG_PATTERN.is_match("te-verde-2"));
        assert!(!SLUG_PATTERN.is_match("Granola"));
        assert!(!SLUG_PATTERN.is_match("granola--miel"));
        assert!(!SLUG_PATTERN.is_match(""));
    }

    #[test]
    fn failed_results_always_carry_a_message() {
        let result: ActionResult<()> = ActionResult::failed("  ");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown error"));
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<i32>>,
    }

    #[test]
    fn double_option_keeps_null_apart_from_missing() {
        let missing: Patch = serde_json::from_str("{}").expect("valid json");
        let null: Patch = serde_json::from_str(r#"{"parent_id": null}"#).expect("valid json");
        let set: Patch = serde_json::from_str(r#"{"parent_id": 3}"#).expect("valid json");
        assert_eq!(missing.parent_id, None);
        assert_eq!(null.parent_id, Some(None));
        assert_eq!(set.parent_id, Some(Some(3)));
    }

    #[test]
    fn blank_required_strings_are_rejected() {
        let product: NewProduct = serde_json::from_value(serde_json::json!({
            "name": "   ",
            "slug": "panela",
            "sku": "END-008",
            "price": 7900
        }))
        .expect("valid json");
        let err = product.validate().expect_err("blank name");
        assert_eq!(validation_message(&err), "name: name is required");

        let patch = ProductPatch {
            sku: Some("\t".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let zone = ShippingZonePatch {
            name: Some(" Nacional ".into()),
            ..Default::default()
        };
        assert!(zone.validate().is_ok());
    }
}
