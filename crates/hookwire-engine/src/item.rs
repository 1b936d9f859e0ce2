//! Domain items carried by dispatch events.
//!
//! The engine never inspects live commerce objects; the boundary that
//! observes a domain event builds one of these narrow item snapshots and
//! tags it with its kind via [`EventItem`]. Each variant carries exactly the
//! fields template enrichment needs, plus a free-form `extra` map that flows
//! into the template context untouched.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::hook::HookType;

/// A postal address attached to an order or quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Recipient first name.
    pub firstname: String,
    /// Recipient last name.
    pub lastname: String,
    /// Street lines.
    pub street: Vec<String>,
    /// City.
    pub city: String,
    /// Region or state.
    pub region: Option<String>,
    /// Postal code.
    pub postcode: String,
    /// ISO country code.
    pub country_id: String,
    /// Contact telephone.
    pub telephone: Option<String>,
    /// Company name.
    pub company: Option<String>,
}

impl Address {
    /// Joins the street lines with `", "`.
    pub fn formatted_street(&self) -> String {
        self.street.join(", ")
    }
}

/// One visible line item of an order or quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier, used for product lookups.
    pub product_id: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Ordered quantity.
    pub qty: f64,
    /// Unit price.
    pub price: f64,
    /// Product image URL when already known at snapshot time.
    pub image_url: Option<String>,
    /// Additional raw fields exposed to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// Creates a line item with the given identity and price.
    pub fn new(product_id: impl Into<String>, sku: impl Into<String>, price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            sku: sku.into(),
            name: String::new(),
            qty: 1.0,
            price,
            image_url: None,
            extra: Map::new(),
        }
    }
}

/// Snapshot of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Store the order was placed in, when known.
    pub store_id: Option<String>,
    /// Human-facing order number.
    pub increment_id: String,
    /// Current order status code.
    pub status: String,
    /// Associated customer, when the order is not a guest checkout.
    pub customer_id: Option<String>,
    /// Payment method display name.
    pub payment_method: String,
    /// Grand total.
    pub grand_total: f64,
    /// Subtotal before shipping and tax.
    pub subtotal: f64,
    /// When the order was created.
    pub created_at: Timestamp,
    /// Visible line items.
    pub items: Vec<LineItem>,
    /// Shipping address, when the order ships.
    pub shipping_address: Option<Address>,
    /// Billing address.
    pub billing_address: Option<Address>,
    /// Additional raw fields exposed to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Creates an order snapshot with the given number and status.
    pub fn new(increment_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            store_id: None,
            increment_id: increment_id.into(),
            status: status.into(),
            customer_id: None,
            payment_method: String::new(),
            grand_total: 0.0,
            subtotal: 0.0,
            created_at: Timestamp::now(),
            items: Vec::new(),
            shipping_address: None,
            billing_address: None,
            extra: Map::new(),
        }
    }
}

/// Snapshot of a dispatched shipment, with its parent order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    /// Store the shipment belongs to, when known.
    pub store_id: Option<String>,
    /// Carrier tracking numbers.
    pub tracks: Vec<String>,
    /// The parent order.
    pub order: Order,
    /// Additional raw fields exposed to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Snapshot of a created invoice, with its parent order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Store the invoice belongs to, when known.
    pub store_id: Option<String>,
    /// Human-facing invoice number.
    pub increment_id: String,
    /// The parent order.
    pub order: Order,
    /// Additional raw fields exposed to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Snapshot of a quote (cart).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Store the cart belongs to, when known.
    pub store_id: Option<String>,
    /// Associated customer, when logged in.
    pub customer_id: Option<String>,
    /// Cart grand total.
    pub grand_total: f64,
    /// Cart subtotal.
    pub subtotal: f64,
    /// Visible line items.
    pub items: Vec<LineItem>,
    /// Shipping address, when already entered.
    pub shipping_address: Option<Address>,
    /// Billing address, when already entered.
    pub billing_address: Option<Address>,
    /// Additional raw fields exposed to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quote {
    /// Creates an empty cart snapshot.
    pub fn new() -> Self {
        Self {
            store_id: None,
            customer_id: None,
            grand_total: 0.0,
            subtotal: 0.0,
            items: Vec::new(),
            shipping_address: None,
            billing_address: None,
            extra: Map::new(),
        }
    }
}

impl Default for Quote {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a customer action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    /// Store the action occurred in, when known.
    pub store_id: Option<String>,
    /// Customer identifier.
    pub customer_id: Option<String>,
    /// Additional raw fields exposed to templates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A domain item tagged with its kind at the system boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventItem {
    /// An order event.
    Order(Order),
    /// An invoice event.
    Invoice(Invoice),
    /// A shipment event.
    Shipment(Shipment),
    /// A cart event.
    Quote(Quote),
    /// A customer event.
    Customer(Customer),
}

impl EventItem {
    /// The hook family this item triggers.
    pub fn hook_type(&self) -> HookType {
        match self {
            Self::Order(_) => HookType::Order,
            Self::Invoice(_) => HookType::Invoice,
            Self::Shipment(_) => HookType::Shipment,
            Self::Quote(_) => HookType::Quote,
            Self::Customer(_) => HookType::Customer,
        }
    }

    /// The store id the item exposes, if any.
    pub fn store_id(&self) -> Option<&str> {
        match self {
            Self::Order(o) => o.store_id.as_deref(),
            Self::Invoice(i) => i.store_id.as_deref(),
            Self::Shipment(s) => s.store_id.as_deref(),
            Self::Quote(q) => q.store_id.as_deref(),
            Self::Customer(c) => c.store_id.as_deref(),
        }
    }

    /// The current order status, for order items only.
    pub fn order_status(&self) -> Option<&str> {
        match self {
            Self::Order(o) => Some(o.status.as_str()),
            _ => None,
        }
    }

    /// The shipping address the item exposes, if any.
    ///
    /// Shipments and invoices expose their parent order's address.
    pub fn shipping_address(&self) -> Option<&Address> {
        match self {
            Self::Order(o) => o.shipping_address.as_ref(),
            Self::Invoice(i) => i.order.shipping_address.as_ref(),
            Self::Shipment(s) => s.order.shipping_address.as_ref(),
            Self::Quote(q) => q.shipping_address.as_ref(),
            Self::Customer(_) => None,
        }
    }

    /// The billing address the item exposes, if any.
    pub fn billing_address(&self) -> Option<&Address> {
        match self {
            Self::Order(o) => o.billing_address.as_ref(),
            Self::Invoice(i) => i.order.billing_address.as_ref(),
            Self::Shipment(s) => s.order.billing_address.as_ref(),
            Self::Quote(q) => q.billing_address.as_ref(),
            Self::Customer(_) => None,
        }
    }
}
