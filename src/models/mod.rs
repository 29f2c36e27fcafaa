pub mod account;
pub mod feed;
pub mod transaction;
pub mod webhook;

pub use account::{Account, Balance, Identity};
pub use feed::FeedItem;
pub use transaction::{Merchant, MerchantRef, Transaction};
pub use webhook::Webhook;

use rust_decimal::Decimal;

/// Convert an amount in minor units (pence, cents) to major units.
pub fn to_major_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}
