//! Unit systems and the lenient number coercion used by every form field.
//!
//! Nothing in here fails: unparseable or out-of-range input is pulled back to a
//! safe bound so the calculation pipeline always sees finite numbers.

use serde::{Deserialize, Serialize};

pub const MM_PER_CM: f64 = 10.0;
pub const MM_PER_INCH: f64 = 25.4;
pub const KG_PER_LB: f64 = 0.453_592_37;

/// Measurement system for lengths and weights entered in the form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric",
            UnitSystem::Imperial => "Imperial",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn length_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn volume_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm³",
            UnitSystem::Imperial => "in³",
        }
    }

    pub fn area_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm²",
            UnitSystem::Imperial => "in²",
        }
    }

    /// Millimetre board thickness expressed in this system's length unit.
    pub fn board_from_mm(&self, mm: f64) -> f64 {
        match self {
            UnitSystem::Metric => mm / MM_PER_CM,
            UnitSystem::Imperial => mm / MM_PER_INCH,
        }
    }

    /// Bounds every outer dimension is clamped into.
    pub fn dimension_bounds(&self) -> (f64, f64) {
        match self {
            UnitSystem::Metric => (0.1, 300.0),
            UnitSystem::Imperial => (0.04, 120.0),
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "metric" | "cm" | "kg" => Some(UnitSystem::Metric),
            "imperial" | "in" | "lb" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Kilogram,
    Pound,
}

impl WeightUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            WeightUnit::Kilogram => "kg",
            WeightUnit::Pound => "lb",
        }
    }

    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kilogram => value,
            WeightUnit::Pound => value * KG_PER_LB,
        }
    }
}

pub const BOARD_MM_MAX: f64 = 20.0;
pub const ACTUAL_WEIGHT_MAX: f64 = 1_000.0;
pub const MONEY_MAX: f64 = 1_000_000_000.0;
pub const PERCENT_MAX: f64 = 100.0;
pub const QUANTITY_MAX: u32 = 100_000;

/// Parses a form value, accepting a comma as decimal separator.
/// Returns `None` for blank, unparseable or non-finite input.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses `raw` and clamps it into `[min, max]`; falls back to `fallback`
/// (itself clamped) when the value cannot be read.
pub fn coerce(raw: &str, min: f64, max: f64, fallback: f64) -> f64 {
    parse_number(raw)
        .unwrap_or(fallback)
        .clamp(min, max)
}

/// Clamps an already-numeric value, mapping NaN/∞ to `fallback`.
pub fn clamp_finite(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback.clamp(min, max)
    }
}

pub fn coerce_dimension(raw: &str, system: UnitSystem) -> f64 {
    let (min, max) = system.dimension_bounds();
    coerce(raw, min, max, min)
}

pub fn coerce_board_mm(raw: &str) -> f64 {
    coerce(raw, 0.0, BOARD_MM_MAX, 0.0)
}

pub fn coerce_actual_weight(raw: &str) -> f64 {
    coerce(raw, 0.0, ACTUAL_WEIGHT_MAX, 0.0)
}

pub fn coerce_money(raw: &str) -> f64 {
    coerce(raw, 0.0, MONEY_MAX, 0.0)
}

pub fn coerce_percent(raw: &str) -> f64 {
    coerce(raw, 0.0, PERCENT_MAX, 0.0)
}

/// Whole units; fractions are truncated and anything below one becomes one.
pub fn coerce_quantity(raw: &str) -> u32 {
    let value = parse_number(raw).unwrap_or(1.0).trunc();
    value.clamp(1.0, QUANTITY_MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_decimals_and_rejects_garbage() {
        assert_eq!(parse_number(" 12,5 "), Some(12.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn dimensions_are_clamped_per_unit_system() {
        assert_eq!(coerce_dimension("-4", UnitSystem::Metric), 0.1);
        assert_eq!(coerce_dimension("900", UnitSystem::Metric), 300.0);
        assert_eq!(coerce_dimension("", UnitSystem::Imperial), 0.04);
        assert_eq!(coerce_dimension("12", UnitSystem::Imperial), 12.0);
    }

    #[test]
    fn imperial_dimensions_stop_at_ten_feet() {
        assert_eq!(coerce_dimension("120", UnitSystem::Imperial), 120.0);
        assert_eq!(coerce_dimension("121,5", UnitSystem::Imperial), 120.0);
        assert_eq!(coerce_dimension("0.01", UnitSystem::Imperial), 0.04);
    }

    #[test]
    fn actual_weight_is_clamped_to_a_tonne() {
        assert_eq!(coerce_actual_weight("-2"), 0.0);
        assert_eq!(coerce_actual_weight(""), 0.0);
        assert_eq!(coerce_actual_weight("0,85"), 0.85);
        assert_eq!(coerce_actual_weight("1000"), ACTUAL_WEIGHT_MAX);
        assert_eq!(coerce_actual_weight("2500"), ACTUAL_WEIGHT_MAX);
    }

    #[test]
    fn board_thickness_converts_into_active_unit() {
        assert!((UnitSystem::Metric.board_from_mm(2.0) - 0.2).abs() < 1e-12);
        assert!((UnitSystem::Imperial.board_from_mm(25.4) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn quantity_is_a_positive_whole_number() {
        assert_eq!(coerce_quantity("0"), 1);
        assert_eq!(coerce_quantity("-3"), 1);
        assert_eq!(coerce_quantity("12.9"), 12);
        assert_eq!(coerce_quantity("oops"), 1);
        assert_eq!(coerce_quantity("1e9"), QUANTITY_MAX);
    }

    #[test]
    fn money_and_percent_never_go_negative() {
        assert_eq!(coerce_money("-10"), 0.0);
        assert_eq!(coerce_percent("250"), 100.0);
        assert_eq!(coerce_percent("7.5"), 7.5);
    }

    #[test]
    fn clamp_finite_replaces_non_finite() {
        assert_eq!(clamp_finite(f64::NAN, 0.0, 10.0, 3.0), 3.0);
        assert_eq!(clamp_finite(f64::INFINITY, 0.0, 10.0, 20.0), 10.0);
        assert_eq!(clamp_finite(4.0, 0.0, 10.0, 3.0), 4.0);
    }

    #[test]
    fn pounds_convert_to_kilograms() {
        assert!((WeightUnit::Pound.to_kg(1.0) - KG_PER_LB).abs() < 1e-12);
        assert_eq!(WeightUnit::Kilogram.to_kg(2.5), 2.5);
    }
}
