use serde::{Deserialize, Serialize};

/// Order lifecycle event carried inside a stream record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    /// Dot/colon-delimited identifier, e.g.
    /// `https://example.net/v5:created-order-for-existing-customer`
    pub event_type: String,
    #[serde(default)]
    pub event_details: OrderDetails,
}

/// Order payload. Only the fields the pipeline reads are typed; everything
/// else is kept verbatim so templates can reference it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    /// Country code used to pick a template variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to_email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OrderDetails {
    /// Render context exposing the order under the `order` key
    pub fn render_context(&self) -> serde_json::Value {
        serde_json::json!({ "order": self })
    }
}

const WELCOME_CUSTOMER_MARKER: &str = "created-order-with-transactional-customer";
const ORDER_CONFIRMATION_MARKER: &str = "created-order-for-existing-customer";

/// Email flow an event type maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFlow {
    WelcomeCustomer,
    OrderConfirmation,
}

impl NotificationFlow {
    /// Classify by case-sensitive substring containment; first marker wins.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        if event_type.contains(WELCOME_CUSTOMER_MARKER) {
            Some(NotificationFlow::WelcomeCustomer)
        } else if event_type.contains(ORDER_CONFIRMATION_MARKER) {
            Some(NotificationFlow::OrderConfirmation)
        } else {
            None
        }
    }

    /// Tag a template name must contain to serve this flow
    pub fn purpose_tag(&self) -> &'static str {
        match self {
            NotificationFlow::WelcomeCustomer => "welcomecustomer",
            NotificationFlow::OrderConfirmation => "orderconfirmation",
        }
    }
}
