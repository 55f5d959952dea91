pub mod calculator;
pub mod setups;

pub use calculator::CalculatorPage;
pub use setups::SetupsPage;
