//! Transactional Emails
//!
//! Plain-text body rendering for transactional mail. Everything the
//! templates need about the storefront arrives through [`StoreConfig`],
//! passed explicitly by the caller — there is no process-wide configuration.
//! Delivery itself is the caller's concern.

use serde::Deserialize;

use crate::quote::CheckoutQuote;

/// Storefront identity rendered into transactional mail.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Customer-facing store name.
    pub store_name: String,

    /// Support mailbox shown in footers.
    pub support_email: String,

    /// Public storefront URL.
    pub base_url: String,

    /// Support phone number.
    pub phone: String,
}

/// Order facts that accompany a quote into the confirmation mail.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    /// Human-facing order number.
    pub order_number: String,

    /// Name the order was placed under.
    pub customer_name: String,
}

/// Render the order-confirmation body for a priced checkout.
pub fn order_confirmation(
    config: &StoreConfig,
    order: &OrderDetails,
    quote: &CheckoutQuote<'_>,
) -> String {
    let mut body = String::new();

    body.push_str(&format!("Dear {},\n\n", order.customer_name));
    body.push_str(&format!(
        "Thank you for shopping with {}! Your order {} has been confirmed.\n\n",
        config.store_name, order.order_number
    ));

    for line in quote.lines() {
        body.push_str(&format!(
            "  {} x{} : {}\n",
            line.name, line.quantity, line.line_total
        ));
    }

    body.push_str(&format!("\nSubtotal:        {}\n", quote.subtotal()));

    if quote.promo_discount().to_minor_units() > 0 {
        body.push_str(&format!("Promo discount: -{}\n", quote.promo_discount()));
    }

    if quote.offer_discount().to_minor_units() > 0 {
        body.push_str(&format!("Offer discount: -{}\n", quote.offer_discount()));
    }

    body.push_str(&format!("Shipping:        {}\n", quote.shipping_charge()));
    body.push_str(&format!("Total:           {}\n", quote.total()));

    if let Some(expected) = quote.expected_delivery() {
        body.push_str(&format!("\nEstimated delivery: {expected}\n"));
    }

    body.push_str(&format!(
        "\nTrack your order at {}/orders/{}\n",
        config.base_url, order.order_number
    ));
    body.push_str(&format!(
        "Questions? Write to {} or call {}.\n",
        config.support_email, config.phone
    ));
    body.push_str(&format!("\nThe {} team\n", config.store_name));

    body
}
