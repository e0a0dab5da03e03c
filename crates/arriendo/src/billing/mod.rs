//! First-payment billing: pro-ration of a partial first month, security
//! deposit, and the short forward schedule shown in the payment preview.

pub mod format;
mod proration;

pub use proration::{
    first_payment_quote, first_payment_quote_for_ymd, ProrationResult, UpcomingCharge,
};
