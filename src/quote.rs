//! Checkout Quotes
//!
//! A quote is the complete priced view of a checkout: per-line unit prices
//! and totals, the cart subtotal, promo and special-offer discounts, the
//! shipping charge, the delivery estimate, and the grand total. It is
//! assembled from already-fetched domain values and performs no I/O.

use chrono::{DateTime, FixedOffset, Utc};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::Cart,
    discounts::DiscountError,
    offers::{OfferDiscount, SpecialOffer, SubtotalGate, discountable_offer_for},
    pricing::{PricingError, extend, final_price},
    products::{Catalog, ProductId},
    promos::{PromoCode, PromoDiscount, promo_discount},
    shipping::{DeliveryMethod, ShippingError, ShippingZone, delivery_duration, expected_delivery_date, shipping_charge},
};

/// Errors raised while assembling a checkout quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// A promo code, offer or zone charge is denominated in a different
    /// currency than the catalog.
    #[error("{subject} is denominated in {actual}, but the catalog uses {expected}")]
    CurrencyMismatch {
        /// What carried the foreign amount.
        subject: String,

        /// Catalog currency code.
        expected: &'static str,

        /// Foreign currency code.
        actual: &'static str,
    },

    /// Errors bubbled up from pricing.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Errors bubbled up from discount arithmetic.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Errors bubbled up from delivery estimation.
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Everything a quote is assembled from. All references point at values the
/// caller fetched for this request; nothing here is mutated.
#[derive(Debug)]
pub struct CheckoutRequest<'a, 'c> {
    /// Cart being priced.
    pub cart: &'c Cart,

    /// Product catalog.
    pub catalog: &'c Catalog<'a>,

    /// Special offers in published priority order (first match wins).
    pub offers: &'c [SpecialOffer<'a>],

    /// Promo code entered by the customer, if any.
    pub promo: Option<&'c PromoCode<'a>>,

    /// Shipping zones.
    pub zones: &'c [ShippingZone<'a>],

    /// Destination city, if one has been selected.
    pub city: Option<&'c str>,

    /// Delivery method, if one has been selected.
    pub delivery: Option<DeliveryMethod>,

    /// When the order was placed, on the storefront clock.
    pub placed_at: DateTime<FixedOffset>,
}

/// A single priced cart line within a quote.
#[derive(Debug, Clone)]
pub struct QuoteLine<'a> {
    /// Product id.
    pub product: ProductId,

    /// Product display name.
    pub name: String,

    /// Selected quantity.
    pub quantity: u32,

    /// Unit price after standing discounts (regular price when a special
    /// offer is live).
    pub unit_price: Money<'a, Currency>,

    /// `unit_price × quantity`.
    pub line_total: Money<'a, Currency>,

    /// Special-offer discount applied to this line.
    pub offer_discount: Money<'a, Currency>,
}

/// Checkout Quote
#[derive(Debug, Clone)]
pub struct CheckoutQuote<'a> {
    lines: Vec<QuoteLine<'a>>,
    subtotal: Money<'a, Currency>,
    promo_discount: Money<'a, Currency>,
    offer_discount: Money<'a, Currency>,
    shipping_charge: Money<'a, Currency>,
    total: Money<'a, Currency>,
    item_count: u64,
    delivery_duration: Option<String>,
    expected_delivery: Option<String>,
    currency: &'static Currency,
}

impl<'a> CheckoutQuote<'a> {
    /// Assemble a quote for a checkout request.
    ///
    /// # Errors
    ///
    /// Returns a [`QuoteError`] if any amount is denominated in a foreign
    /// currency, a cart line references an unknown product, or arithmetic
    /// fails.
    pub fn assemble(request: &CheckoutRequest<'a, '_>) -> Result<Self, QuoteError> {
        let currency = request.catalog.currency();
        validate_currencies(request, currency)?;

        let now = request.placed_at.with_timezone(&Utc);
        let zero = Money::from_minor(0, currency);

        let mut lines = Vec::with_capacity(request.cart.len());
        let mut subtotal = zero;

        for cart_line in request.cart.lines() {
            let product = request
                .catalog
                .lookup(cart_line.product())
                .ok_or_else(|| PricingError::UnknownProduct(cart_line.product().clone()))?;

            let unit_price = final_price(product, request.offers, now)?;
            let line_total = extend(cart_line.product(), &unit_price, cart_line.quantity())?;
            subtotal = subtotal.add(line_total)?;

            lines.push(QuoteLine {
                product: product.id.clone(),
                name: product.name.clone(),
                quantity: cart_line.quantity(),
                unit_price,
                line_total,
                offer_discount: zero,
            });
        }

        debug!(
            lines = lines.len(),
            subtotal_minor = subtotal.to_minor_units(),
            "priced cart lines"
        );

        // The subtotal is now known, so gated offers can be resolved and the
        // line-discount pass can run.
        let mut offer_total = zero;

        for line in &mut lines {
            let Some(product) = request.catalog.lookup(&line.product) else {
                // The pricing pass above already resolved every line.
                continue;
            };

            if let Some(offer) =
                discountable_offer_for(product, request.offers, &subtotal, now)
            {
                let discount = offer.line_discount(product, line.quantity)?;
                line.offer_discount = discount;
                offer_total = offer_total.add(discount)?;
            }
        }

        let promo_total = match request.promo {
            Some(promo) if !request.cart.is_empty() => promo_discount(promo, &subtotal, now)?,
            _ => zero,
        };

        let shipping = shipping_charge(request.city, request.delivery, request.zones, currency);
        let duration = delivery_duration(request.city, request.delivery, request.zones);

        let expected_delivery = duration
            .as_deref()
            .map(|duration| {
                expected_delivery_date(
                    request.placed_at,
                    request.delivery.unwrap_or(DeliveryMethod::Standard),
                    duration,
                )
            })
            .transpose()?;

        let total = subtotal
            .sub(promo_total)?
            .sub(offer_total)?
            .add(shipping)?;

        debug!(
            promo_minor = promo_total.to_minor_units(),
            offer_minor = offer_total.to_minor_units(),
            shipping_minor = shipping.to_minor_units(),
            total_minor = total.to_minor_units(),
            "assembled checkout quote"
        );

        Ok(Self {
            lines,
            subtotal,
            promo_discount: promo_total,
            offer_discount: offer_total,
            shipping_charge: shipping,
            total,
            item_count: request.cart.item_count(),
            delivery_duration: duration,
            expected_delivery,
            currency,
        })
    }

    /// Priced cart lines in cart order.
    pub fn lines(&self) -> &[QuoteLine<'a>] {
        &self.lines
    }

    /// Cart subtotal before cart-level discounts and shipping.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Promo-code discount (zero when no eligible code was entered).
    pub fn promo_discount(&self) -> Money<'a, Currency> {
        self.promo_discount
    }

    /// Total special-offer discount across all lines.
    pub fn offer_discount(&self) -> Money<'a, Currency> {
        self.offer_discount
    }

    /// Shipping charge for the selected destination.
    pub fn shipping_charge(&self) -> Money<'a, Currency> {
        self.shipping_charge
    }

    /// Grand total: `subtotal − promo − offers + shipping`.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Total number of selected units.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Raw delivery-duration string for the destination, if routable.
    pub fn delivery_duration(&self) -> Option<&str> {
        self.delivery_duration.as_deref()
    }

    /// Long-form estimated delivery date, if routable.
    pub fn expected_delivery(&self) -> Option<&str> {
        self.expected_delivery.as_deref()
    }

    /// Currency every amount in this quote is denominated in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total amount the discounts saved the customer.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.promo_discount.add(self.offer_discount)
    }
}

/// Reject any request amount denominated in a foreign currency up front, so
/// later arithmetic never mixes currencies.
fn validate_currencies(
    request: &CheckoutRequest<'_, '_>,
    currency: &'static Currency,
) -> Result<(), QuoteError> {
    let mismatch = |subject: String, actual: &Currency| QuoteError::CurrencyMismatch {
        subject,
        expected: currency.iso_alpha_code,
        actual: actual.iso_alpha_code,
    };

    if let Some(promo) = request.promo {
        for amount in [Some(&promo.min_subtotal), promo.cap.as_ref()]
            .into_iter()
            .flatten()
        {
            if amount.currency() != currency {
                return Err(mismatch(
                    format!("promo code {}", promo.code),
                    amount.currency(),
                ));
            }
        }

        if let PromoDiscount::Amount(amount) = &promo.discount {
            if amount.currency() != currency {
                return Err(mismatch(
                    format!("promo code {}", promo.code),
                    amount.currency(),
                ));
            }
        }
    }

    for offer in request.offers {
        let gate_amount = match &offer.gate {
            SubtotalGate::AtLeast(amount) => Some(amount),
            SubtotalGate::NotApplicable => None,
        };
        let discount_amount = match &offer.discount {
            OfferDiscount::Amount(amount) => Some(amount),
            OfferDiscount::Percentage(_) => None,
        };

        for amount in [discount_amount, offer.cap.as_ref(), gate_amount]
            .into_iter()
            .flatten()
        {
            if amount.currency() != currency {
                return Err(mismatch(format!("offer {}", offer.name), amount.currency()));
            }
        }
    }

    for zone in request.zones {
        for method in [DeliveryMethod::Standard, DeliveryMethod::Express] {
            if let Some(charge) = zone.schedule.charge(method) {
                if charge.currency() != currency {
                    return Err(mismatch(format!("zone {}", zone.name), charge.currency()));
                }
            }
        }
    }

    Ok(())
}
