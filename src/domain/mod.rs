//! Box geometry, dimensional weight and shipping cost live here.

pub mod app_state;
pub mod calculator;
pub mod catalog;
pub mod economics;
pub mod preview;
pub mod rates;
pub mod setups;
pub mod units;
pub mod volumetric;

pub use app_state::AppState;
pub use calculator::{calculate, calculate_many, BoxStyle, Calculation, CalculatorForm};
pub use catalog::{
    Catalog, CatalogError, HandlingClass, DESTINATIONS, SOURCE_CURRENCY, TARGET_CURRENCY,
};
pub use preview::PreviewMode;
pub use rates::{PricingMode, RateOutcome};
pub use setups::{SavedSetup, SetupRepository};
pub use units::UnitSystem;
