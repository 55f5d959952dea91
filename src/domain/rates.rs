//! Shipping fee resolution: tiered sheet lookup or flat manual per-kg pricing.

use serde::{Deserialize, Serialize};

use super::catalog::{Bracket, HandlingClass, ManualRate, RateSheet};

/// Which pricing strategy the form asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    #[default]
    Sheet,
    Manual,
}

impl PricingMode {
    pub fn label(&self) -> &'static str {
        match self {
            PricingMode::Sheet => "Rate sheet",
            PricingMode::Manual => "Manual per-kg",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PricingMode::Sheet => "sheet",
            PricingMode::Manual => "manual",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [PricingMode::Sheet, PricingMode::Manual]
            .into_iter()
            .find(|mode| mode.code() == code)
    }
}

/// A priced shipment in the sheet's source currency.
#[derive(Clone, Debug, PartialEq)]
pub struct RateQuote {
    pub billed_kg: f64,
    pub fee: f64,
    /// Bracket the sheet strategy priced against; `None` for manual pricing.
    pub bracket: Option<Bracket>,
    pub breakdown: String,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("no {0} brackets configured")]
    EmptyBrackets(&'static str),
    #[error("weight {0} is not a finite number")]
    NonFiniteWeight(f64),
}

/// Result of asking the engine for a price.
#[derive(Clone, Debug, PartialEq)]
pub enum RateOutcome {
    Quoted(RateQuote),
    Unsupported { requested: String, available: String },
    Failed(RateError),
}

impl RateOutcome {
    pub fn quote(&self) -> Option<&RateQuote> {
        match self {
            RateOutcome::Quoted(quote) => Some(quote),
            _ => None,
        }
    }

    /// Fee to carry into cost arithmetic; unpriced routes contribute nothing.
    pub fn fee_or_zero(&self) -> f64 {
        self.quote().map(|q| q.fee).unwrap_or(0.0)
    }

    pub fn billed_kg_or_zero(&self) -> f64 {
        self.quote().map(|q| q.billed_kg).unwrap_or(0.0)
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, RateOutcome::Quoted(_))
    }

    pub fn describe(&self) -> String {
        match self {
            RateOutcome::Quoted(quote) => quote.breakdown.clone(),
            RateOutcome::Unsupported { requested, available } => format!(
                "No rate sheet for {requested}; only {available} is priced."
            ),
            RateOutcome::Failed(err) => format!("Rate lookup failed: {err}"),
        }
    }
}

/// Rounds `value` up to the next multiple of `step`.
///
/// Division noise below a billionth of a step is ignored so exact multiples
/// such as 1.32 / 0.001 stay put, and the product is snapped to a 1e-9 grid so
/// 700 × 0.001 compares equal to a 0.70 bracket bound.
///
/// Bound: `round_up(w, step) >= w - step * 1e-9` and `round_up(w, step) - step < w`.
/// A value within a billionth of a step above a multiple lands on that multiple.
pub fn round_up(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    let units = value / step;
    let nearest = units.round();
    let units = if (units - nearest).abs() < 1e-9 {
        nearest
    } else {
        units.ceil()
    };
    (units * step * 1e9).round() / 1e9
}

/// First bracket containing `billed_kg`, or the last one when the weight runs
/// past the table.
pub fn select_bracket(brackets: &[Bracket], billed_kg: f64) -> Option<&Bracket> {
    brackets
        .iter()
        .find(|bracket| bracket.contains(billed_kg))
        .or_else(|| brackets.last())
}

pub fn quote_sheet(
    sheet: &RateSheet,
    jurisdiction: &str,
    class: HandlingClass,
    weight_kg: f64,
) -> RateOutcome {
    if !sheet.jurisdiction.eq_ignore_ascii_case(jurisdiction.trim()) {
        return RateOutcome::Unsupported {
            requested: jurisdiction.trim().to_string(),
            available: sheet.jurisdiction.clone(),
        };
    }
    if !weight_kg.is_finite() {
        return RateOutcome::Failed(RateError::NonFiniteWeight(weight_kg));
    }

    let brackets = sheet.brackets(class);
    let rounded = round_up(weight_kg.max(0.0), sheet.rounding_step_kg);
    let billed_kg = rounded.max(sheet.min_weight_kg);

    let Some(bracket) = select_bracket(brackets, billed_kg) else {
        return RateOutcome::Failed(RateError::EmptyBrackets(class.label()));
    };

    let fee = bracket.per_kg_fee * billed_kg + bracket.item_fee;
    let breakdown = format!(
        "{} · {} · billed {:.3} kg (min {:.3}, step {}) · bracket {} · {:.2}/kg × {:.3} + {:.2} = {:.2} {}",
        sheet.jurisdiction,
        class.label(),
        billed_kg,
        sheet.min_weight_kg,
        sheet.rounding_step_kg,
        bracket.label(),
        bracket.per_kg_fee,
        billed_kg,
        bracket.item_fee,
        fee,
        sheet.currency,
    );

    RateOutcome::Quoted(RateQuote {
        billed_kg,
        fee,
        bracket: Some(*bracket),
        breakdown,
    })
}

/// Started-kilogram billing: any fraction of a kilogram counts as a whole one.
pub fn quote_manual(rate: &ManualRate, weight_kg: f64, currency: &str) -> RateOutcome {
    if !weight_kg.is_finite() {
        return RateOutcome::Failed(RateError::NonFiniteWeight(weight_kg));
    }
    let billed_kg = weight_kg.max(0.0).ceil();
    let per_kg = rate.per_kg_fee.max(0.0);
    let min_charge = rate.min_charge.max(0.0);
    let raw = per_kg * billed_kg;
    let fee = raw.max(min_charge);

    let breakdown = if fee > raw {
        format!(
            "manual · billed {billed_kg:.0} kg × {per_kg:.2}/kg = {raw:.2}, raised to minimum {min_charge:.2} {currency}"
        )
    } else {
        format!("manual · billed {billed_kg:.0} kg × {per_kg:.2}/kg = {fee:.2} {currency}")
    };

    RateOutcome::Quoted(RateQuote {
        billed_kg,
        fee,
        bracket: None,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::RateSheet;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn round_up_carries_partial_steps() {
        assert!(close(round_up(0.0011, 0.001), 0.002));
        assert!(close(round_up(1.32, 0.001), 1.32));
        assert!(close(round_up(0.0, 0.001), 0.0));
        assert!(close(round_up(2.0001, 0.5), 2.5));
    }

    #[test]
    fn round_up_lies_between_a_billionth_of_a_step_below_and_one_step_above() {
        let steps = [0.001, 0.01, 0.25, 1.0];
        for step in steps {
            let mut w = 0.0;
            while w < 5.0 {
                let rounded = round_up(w, step);
                assert!(rounded >= w - step * 1e-9, "{rounded} < {w} (step {step})");
                assert!(rounded - step < w, "{rounded} over-rounds {w} (step {step})");
                w += 0.0137;
            }
        }
    }

    #[test]
    fn noise_within_a_billionth_of_a_step_is_absorbed() {
        let w = 0.001_000_000_000_1;
        let rounded = round_up(w, 0.001);
        assert_eq!(rounded, 0.001);
        assert!(rounded < w);
        assert!(rounded >= w - 0.001 * 1e-9);
        assert!(close(round_up(0.001_01, 0.001), 0.002));
    }

    #[test]
    fn us_general_example_prices_in_the_seven_hundred_gram_to_two_kilo_band() {
        let sheet = RateSheet::builtin_us();
        let outcome = quote_sheet(&sheet, "US", HandlingClass::General, 1.32);
        let quote = outcome.quote().expect("priced");
        assert!(close(quote.billed_kg, 1.32));
        let bracket = quote.bracket.unwrap();
        assert_eq!((bracket.lower_kg, bracket.upper_kg), (0.70, 2.00));
        assert!((quote.fee - 133.12).abs() < 1e-6);
        assert!(quote.breakdown.contains("(0.70, 2.00]"));
    }

    #[test]
    fn minimum_weight_applies_to_tiny_parcels() {
        let sheet = RateSheet::builtin_us();
        let quote = quote_sheet(&sheet, "us", HandlingClass::General, 0.001)
            .quote()
            .cloned()
            .unwrap();
        assert!(close(quote.billed_kg, 0.03));
        assert!(close(quote.fee, 98.0 * 0.03 + 17.0));
    }

    #[test]
    fn upper_bound_belongs_to_the_lower_bracket() {
        let sheet = RateSheet::builtin_us();
        let quote = quote_sheet(&sheet, "US", HandlingClass::General, 0.70)
            .quote()
            .cloned()
            .unwrap();
        assert_eq!(quote.bracket.unwrap().upper_kg, 0.70);
        let next = quote_sheet(&sheet, "US", HandlingClass::General, 0.7001)
            .quote()
            .cloned()
            .unwrap();
        assert_eq!(next.bracket.unwrap().lower_kg, 0.70);
    }

    #[test]
    fn every_weight_resolves_to_exactly_one_bracket() {
        let sheet = RateSheet::builtin_us();
        for class in [HandlingClass::General, HandlingClass::Battery] {
            let brackets = sheet.brackets(class);
            let mut w = 0.0005;
            while w <= 30.0 {
                let matches = brackets.iter().filter(|b| b.contains(w)).count();
                assert_eq!(matches, 1, "weight {w} matched {matches} brackets");
                w += 0.0173;
            }
        }
    }

    #[test]
    fn overweight_parcels_use_the_last_bracket() {
        let sheet = RateSheet::builtin_us();
        let quote = quote_sheet(&sheet, "US", HandlingClass::Battery, 45.0)
            .quote()
            .cloned()
            .unwrap();
        let last = *sheet.battery.last().unwrap();
        assert_eq!(quote.bracket, Some(last));
        assert!(close(quote.fee, last.per_kg_fee * 45.0 + last.item_fee));
    }

    #[test]
    fn battery_classification_uses_its_own_table() {
        let sheet = RateSheet::builtin_us();
        let quote = quote_sheet(&sheet, "US", HandlingClass::Battery, 1.32)
            .quote()
            .cloned()
            .unwrap();
        assert!((quote.fee - (97.0 * 1.32 + 15.0)).abs() < 1e-6);
    }

    #[test]
    fn other_jurisdictions_are_unsupported_not_free() {
        let sheet = RateSheet::builtin_us();
        let outcome = quote_sheet(&sheet, "DE", HandlingClass::General, 1.0);
        assert_eq!(
            outcome,
            RateOutcome::Unsupported {
                requested: "DE".to_string(),
                available: "US".to_string(),
            }
        );
        assert_eq!(outcome.fee_or_zero(), 0.0);
        assert!(!outcome.is_priced());
        assert!(outcome.describe().contains("DE"));
    }

    #[test]
    fn empty_table_is_a_failure() {
        let mut sheet = RateSheet::builtin_us();
        sheet.general.clear();
        let outcome = quote_sheet(&sheet, "US", HandlingClass::General, 1.0);
        assert_eq!(outcome, RateOutcome::Failed(RateError::EmptyBrackets("general")));
    }

    #[test]
    fn manual_pricing_bills_started_kilograms() {
        let rate = ManualRate {
            per_kg_fee: 50.0,
            min_charge: 0.0,
            exchange_rate: 7.2,
        };
        let quote = quote_manual(&rate, 1.32, "CNY").quote().cloned().unwrap();
        assert_eq!(quote.billed_kg, 2.0);
        assert_eq!(quote.fee, 100.0);

        let tiny = quote_manual(&rate, 0.01, "CNY").quote().cloned().unwrap();
        assert_eq!(tiny.billed_kg, 1.0);
    }

    #[test]
    fn manual_zero_weight_costs_the_minimum_charge() {
        let rate = ManualRate {
            per_kg_fee: 50.0,
            min_charge: 30.0,
            exchange_rate: 7.2,
        };
        let quote = quote_manual(&rate, 0.0, "CNY").quote().cloned().unwrap();
        assert_eq!(quote.billed_kg, 0.0);
        assert_eq!(quote.fee, 30.0);
        assert!(quote.breakdown.contains("minimum"));

        let heavy = quote_manual(&rate, 1.32, "CNY").quote().cloned().unwrap();
        assert_eq!(heavy.fee, 100.0);
    }

    #[test]
    fn non_finite_weight_fails_instead_of_pricing() {
        let outcome = quote_manual(&ManualRate::default(), f64::NAN, "CNY");
        assert!(matches!(outcome, RateOutcome::Failed(RateError::NonFiniteWeight(_))));
    }

    #[test]
    fn pricing_mode_codes_round_trip() {
        for mode in [PricingMode::Sheet, PricingMode::Manual] {
            assert_eq!(PricingMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(PricingMode::from_code("auction"), None);
    }
}
