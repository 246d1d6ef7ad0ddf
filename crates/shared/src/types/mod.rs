//! Common types used across the application.

pub mod money;

pub use money::{CURRENCY_SCALE, round_currency};
