//! Event-context enrichment.
//!
//! Before rendering, the triggering item is serialized into a name→value
//! context and extended with derived fields template authors reference by
//! name (`order_total_formatted`, `tracking_codes`, …). Enrichment is
//! dispatched on the item's kind tag, never on runtime type inspection, and
//! is idempotent: the same item with the same lookups yields the same
//! context.
//!
//! Optional lookups (customer, product) return `Option`; absence degrades
//! the context to a missing field and never aborts enrichment.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::item::{EventItem, Invoice, LineItem, Order, Quote, Shipment};
use crate::repository::{CustomerLookup, ProductLookup};

/// The name→value mapping exposed to template rendering for one dispatch.
pub type EventContext = Map<String, Value>;

/// Builds the per-event template context from a domain item.
#[derive(Clone)]
pub struct Enricher {
    products: Arc<dyn ProductLookup>,
    customers: Arc<dyn CustomerLookup>,
    cart_url: String,
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("cart_url", &self.cart_url)
            .finish_non_exhaustive()
    }
}

impl Enricher {
    /// Creates an enricher with the given lookups and absolute checkout URL.
    pub fn new(
        products: Arc<dyn ProductLookup>,
        customers: Arc<dyn CustomerLookup>,
        cart_url: impl Into<String>,
    ) -> Self {
        Self {
            products,
            customers,
            cart_url: cart_url.into(),
        }
    }

    /// Builds the template context for one item.
    pub async fn enrich(&self, item: &EventItem) -> EventContext {
        let mut ctx = match item {
            EventItem::Order(order) => self.enrich_order(order).await,
            EventItem::Invoice(invoice) => self.enrich_invoice(invoice).await,
            EventItem::Shipment(shipment) => self.enrich_shipment(shipment).await,
            EventItem::Quote(quote) => self.enrich_quote(quote).await,
            EventItem::Customer(customer) => serialize(customer),
        };

        ctx.insert("cart_url".into(), Value::from(self.cart_url.clone()));

        if let Some(address) = item.shipping_address() {
            ctx.insert("shippingAddress".into(), Value::Object(serialize(address)));
            ctx.insert(
                "formatted_shipping_street".into(),
                Value::from(address.formatted_street()),
            );
        }
        if let Some(address) = item.billing_address() {
            ctx.insert("billingAddress".into(), Value::Object(serialize(address)));
            ctx.insert(
                "formatted_billing_street".into(),
                Value::from(address.formatted_street()),
            );
        }

        ctx
    }

    async fn enrich_order(&self, order: &Order) -> EventContext {
        let mut ctx = serialize(order);

        ctx.insert(
            "payment_method_name".into(),
            Value::from(order.payment_method.clone()),
        );
        ctx.insert("order_total_formatted".into(), Value::from(money(order.grand_total)));
        ctx.insert(
            "order_subtotal_formatted".into(),
            Value::from(money(order.subtotal)),
        );

        self.enrich_line_items(&mut ctx, &order.items, true).await;

        if let Some(customer_id) = &order.customer_id
            && let Some(customer) = self.customers.find(customer_id).await
            && let Some(taxvat) = customer.taxvat
        {
            ctx.insert("customer_taxvat".into(), Value::from(taxvat));
        }

        ctx
    }

    async fn enrich_shipment(&self, shipment: &Shipment) -> EventContext {
        let mut ctx = serialize(shipment);

        ctx.insert(
            "tracking_codes".into(),
            Value::from(shipment.tracks.join(", ")),
        );
        self.parent_order_fields(&mut ctx, &shipment.order).await;

        ctx
    }

    async fn enrich_invoice(&self, invoice: &Invoice) -> EventContext {
        let mut ctx = serialize(invoice);

        // The `_ship` suffix on these fields is shared with shipment
        // enrichment; renaming would break deployed templates.
        self.parent_order_fields(&mut ctx, &invoice.order).await;

        ctx
    }

    async fn enrich_quote(&self, quote: &Quote) -> EventContext {
        let mut ctx = serialize(quote);

        self.enrich_line_items(&mut ctx, &quote.items, false).await;

        ctx.insert("cart_total_formatted".into(), Value::from(money(quote.grand_total)));
        ctx.insert(
            "cart_subtotal_formatted".into(),
            Value::from(money(quote.subtotal)),
        );

        if let Some(customer_id) = &quote.customer_id
            && let Some(customer) = self.customers.find(customer_id).await
            && let Some(cellphone) = customer.cellphone
        {
            ctx.insert("customer_cellphone_cart".into(), Value::from(cellphone));
        }

        ctx
    }

    /// Fields derived from a shipment's or invoice's parent order.
    async fn parent_order_fields(&self, ctx: &mut EventContext, order: &Order) {
        ctx.insert(
            "order_increment_id".into(),
            Value::from(order.increment_id.clone()),
        );
        ctx.insert(
            "order_total_formatted_ship".into(),
            Value::from(money(order.grand_total)),
        );
        ctx.insert(
            "order_subtotal_formatted_ship".into(),
            Value::from(money(order.subtotal)),
        );
        ctx.insert(
            "order_created_at".into(),
            Value::from(
                order
                    .created_at
                    .strftime("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
        );

        if let Some(customer_id) = &order.customer_id
            && let Some(customer) = self.customers.find(customer_id).await
            && let Some(taxvat) = customer.taxvat
        {
            ctx.insert("customer_taxvat_ship".into(), Value::from(taxvat));
        }
    }

    /// Adds per-line-item derived fields to the context's `items` array.
    async fn enrich_line_items(
        &self,
        ctx: &mut EventContext,
        items: &[LineItem],
        with_price: bool,
    ) {
        let Some(entries) = ctx.get_mut("items").and_then(Value::as_array_mut) else {
            return;
        };

        for (line, entry) in items.iter().zip(entries.iter_mut()) {
            let Some(fields) = entry.as_object_mut() else {
                continue;
            };

            if let Some(product) = self.products.find(&line.product_id).await {
                if let Some(url) = product.url {
                    fields.insert("product_url".into(), Value::from(url));
                }
                if line.image_url.is_none()
                    && let Some(image_url) = product.image_url
                {
                    fields.insert("image_url".into(), Value::from(image_url));
                }
            }

            if with_price {
                fields.insert(
                    "product_price_formatted".into(),
                    Value::from(money(line.price)),
                );
            }
        }
    }
}

/// Fixed two-decimal formatting with `.` separator.
fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn serialize<T: serde::Serialize>(value: &T) -> EventContext {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
