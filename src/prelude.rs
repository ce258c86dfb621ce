//! Jamdani prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    calendar::{CalendarError, end_of_day, long_date, parse_order_timestamp},
    cart::{Cart, CartError, CartLine},
    discounts::{DiscountError, RegularDiscount},
    emails::{OrderDetails, StoreConfig, order_confirmation},
    fixtures::{Fixture, FixtureError},
    inventory::{InventoryError, StockLedger},
    offers::{
        OfferDiscount, OfferScope, SpecialOffer, SubtotalGate, discountable_offer_for,
        has_any_discount, has_live_offer, has_only_regular_discount, live_offer_for,
    },
    pricing::{PricingError, final_price, subtotal},
    products::{Catalog, CatalogError, Category, Product, ProductId, ProductKey},
    promos::{PromoCode, PromoDiscount, promo_discount},
    quote::{CheckoutQuote, CheckoutRequest, QuoteError, QuoteLine},
    shipping::{
        DeliveryMethod, ShippingError, ShippingZone, ZoneSchedule, delivery_duration,
        expected_delivery_date, shipping_charge,
    },
};
