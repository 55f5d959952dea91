//! Currency conversion and per-unit landed cost.

use super::{
    catalog::DEFAULT_EXCHANGE_RATE,
    units::{clamp_finite, MONEY_MAX, PERCENT_MAX},
};

const MIN_EXCHANGE_RATE: f64 = 1e-6;

/// Usable exchange rate: the default when the input is non-finite or not
/// positive, never below a tiny floor.
pub fn effective_exchange_rate(rate: f64) -> f64 {
    let rate = if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        DEFAULT_EXCHANGE_RATE
    };
    rate.max(MIN_EXCHANGE_RATE)
}

/// Converts a source-currency amount using a source-per-target rate.
pub fn convert_currency(amount: f64, rate: f64) -> f64 {
    amount / effective_exchange_rate(rate)
}

/// Inputs to the landed-cost roll-up, all in the target currency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostInputs {
    pub shipping_fee: f64,
    pub quantity: u32,
    pub unit_price: f64,
    pub product_cost: f64,
    pub variable_fee_pct: f64,
    pub refund_fee_pct: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitEconomics {
    pub shipping_per_unit: f64,
    pub product_cost: f64,
    pub variable_fee: f64,
    pub refund_fee: f64,
    pub cost_per_unit: f64,
    pub total_cost: f64,
}

fn money(value: f64) -> f64 {
    clamp_finite(value, 0.0, MONEY_MAX, 0.0)
}

fn percent(value: f64) -> f64 {
    clamp_finite(value, 0.0, PERCENT_MAX, 0.0)
}

pub fn unit_economics(inputs: &CostInputs) -> UnitEconomics {
    let quantity = inputs.quantity.max(1) as f64;
    let price = money(inputs.unit_price);

    let shipping_per_unit = money(inputs.shipping_fee) / quantity;
    let product_cost = money(inputs.product_cost);
    let variable_fee = price * percent(inputs.variable_fee_pct) / 100.0;
    let refund_fee = price * percent(inputs.refund_fee_pct) / 100.0;
    let cost_per_unit = shipping_per_unit + product_cost + variable_fee + refund_fee;

    UnitEconomics {
        shipping_per_unit,
        product_cost,
        variable_fee,
        refund_fee,
        cost_per_unit,
        total_cost: cost_per_unit * quantity,
    }
}
