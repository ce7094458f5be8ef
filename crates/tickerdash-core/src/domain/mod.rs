//! # Domain Models
//!
//! Input types of one dashboard update cycle.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Trimmed, uppercased ticker symbol |
//! | [`AssetType`] | Asset class selector (stock, etf, crypto) |
//! | [`DateRange`] | Clamped, ordered date range |
//! | [`FormInput`] | Raw form values |
//! | [`DashboardRequest`] | Validated body of the data request |
//!
//! ## Date window
//!
//! Dates are always corrected, never rejected: both ends are clamped to
//! `[2020-01-01, 2025-08-31]` and a start after the end is pulled back.
//!
//! ```rust
//! use tickerdash_core::DateRange;
//!
//! let range = DateRange::from_inputs("2019-01-01", "2030-01-01");
//! assert_eq!(range.to_string(), "2020-01-01..2025-08-31");
//! ```

mod asset_type;
mod date_range;
mod request;
mod ticker;

pub use asset_type::AssetType;
pub use date_range::{
    clamp_date, format_iso_date, parse_iso_date, DateRange, MAX_DATE, MIN_DATE,
};
pub use request::{DashboardRequest, FormInput};
pub use ticker::Ticker;
