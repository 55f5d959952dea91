//! Static pricing configuration: divisor profiles, the tiered rate sheet and
//! the list of selectable destinations.
//!
//! A [`Catalog`] is built once at startup and handed to the calculator by
//! reference; nothing mutates it afterwards.

use serde::{Deserialize, Serialize};

use super::units::{UnitSystem, WeightUnit};

/// A carrier/service convention for turning volume into weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DivisorProfile {
    pub id: String,
    pub label: String,
    pub divisor: f64,
    pub weight_unit: WeightUnit,
}

impl DivisorProfile {
    fn new(id: &str, label: &str, divisor: f64, weight_unit: WeightUnit) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            divisor,
            weight_unit,
        }
    }

    /// Used when a unit system has no profiles at all.
    pub fn absolute_default() -> Self {
        Self::new("express_5000", "Express courier (÷5000)", 5000.0, WeightUnit::Kilogram)
    }

    /// Divisor safe to divide by.
    pub fn effective_divisor(&self) -> f64 {
        if self.divisor.is_finite() && self.divisor > 0.0 {
            self.divisor
        } else {
            1.0
        }
    }
}

/// Profile selection after checking it against the active unit system.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDivisor {
    pub profile: DivisorProfile,
    /// Set when the requested id was not valid for the unit system.
    pub advisory: Option<String>,
}

/// Handling classification that picks the bracket list of a sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingClass {
    #[default]
    General,
    Battery,
}

impl HandlingClass {
    pub fn from_battery_flag(has_battery: bool) -> Self {
        if has_battery {
            HandlingClass::Battery
        } else {
            HandlingClass::General
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HandlingClass::General => "general",
            HandlingClass::Battery => "battery",
        }
    }
}

/// One weight band of a rate sheet: `(lower, upper]` in kilograms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower_kg: f64,
    pub upper_kg: f64,
    pub per_kg_fee: f64,
    pub item_fee: f64,
}

impl Bracket {
    const fn new(lower_kg: f64, upper_kg: f64, per_kg_fee: f64, item_fee: f64) -> Self {
        Self {
            lower_kg,
            upper_kg,
            per_kg_fee,
            item_fee,
        }
    }

    pub fn contains(&self, billed_kg: f64) -> bool {
        billed_kg > self.lower_kg && billed_kg <= self.upper_kg
    }

    pub fn label(&self) -> String {
        format!("({:.2}, {:.2}]", self.lower_kg, self.upper_kg)
    }
}

/// Tiered fee table for a single destination jurisdiction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateSheet {
    pub jurisdiction: String,
    pub name: String,
    pub currency: String,
    pub min_weight_kg: f64,
    pub rounding_step_kg: f64,
    pub general: Vec<Bracket>,
    pub battery: Vec<Bracket>,
}

impl RateSheet {
    pub fn brackets(&self, class: HandlingClass) -> &[Bracket] {
        match class {
            HandlingClass::General => &self.general,
            HandlingClass::Battery => &self.battery,
        }
    }

    pub fn max_weight_kg(&self, class: HandlingClass) -> Option<f64> {
        self.brackets(class).last().map(|bracket| bracket.upper_kg)
    }

    /// Compiled-in United States sheet (CNY).
    pub fn builtin_us() -> Self {
        const GENERAL: [Bracket; 6] = [
            Bracket::new(0.0, 0.10, 98.0, 17.0),
            Bracket::new(0.10, 0.20, 95.0, 16.0),
            Bracket::new(0.20, 0.45, 93.0, 15.0),
            Bracket::new(0.45, 0.70, 92.0, 14.0),
            Bracket::new(0.70, 2.00, 91.0, 13.0),
            Bracket::new(2.00, 30.00, 88.0, 12.0),
        ];
        const BATTERY: [Bracket; 6] = [
            Bracket::new(0.0, 0.10, 104.0, 19.0),
            Bracket::new(0.10, 0.20, 101.0, 18.0),
            Bracket::new(0.20, 0.45, 99.0, 17.0),
            Bracket::new(0.45, 0.70, 98.0, 16.0),
            Bracket::new(0.70, 2.00, 97.0, 15.0),
            Bracket::new(2.00, 30.00, 94.0, 14.0),
        ];

        Self {
            jurisdiction: "US".to_string(),
            name: "United States".to_string(),
            currency: SOURCE_CURRENCY.to_string(),
            min_weight_kg: 0.03,
            rounding_step_kg: 0.001,
            general: GENERAL.to_vec(),
            battery: BATTERY.to_vec(),
        }
    }

    /// Checks the structural guarantees lookup relies on: every list starts at
    /// zero, is contiguous and strictly increasing, and the step/minimum are sane.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !(self.rounding_step_kg.is_finite() && self.rounding_step_kg > 0.0) {
            return Err(CatalogError::InvalidSheet(format!(
                "rounding step must be positive, got {}",
                self.rounding_step_kg
            )));
        }
        if !(self.min_weight_kg.is_finite() && self.min_weight_kg >= 0.0) {
            return Err(CatalogError::InvalidSheet(format!(
                "minimum weight must be non-negative, got {}",
                self.min_weight_kg
            )));
        }
        for class in [HandlingClass::General, HandlingClass::Battery] {
            let brackets = self.brackets(class);
            if brackets.is_empty() {
                return Err(CatalogError::InvalidSheet(format!(
                    "{} bracket list is empty",
                    class.label()
                )));
            }
            let mut expected_lower = 0.0;
            for bracket in brackets {
                if (bracket.lower_kg - expected_lower).abs() > 1e-9 {
                    return Err(CatalogError::InvalidSheet(format!(
                        "{} bracket {} does not continue from {:.3}",
                        class.label(),
                        bracket.label(),
                        expected_lower
                    )));
                }
                if bracket.upper_kg <= bracket.lower_kg
                    || bracket.per_kg_fee < 0.0
                    || bracket.item_fee < 0.0
                {
                    return Err(CatalogError::InvalidSheet(format!(
                        "{} bracket {} is malformed",
                        class.label(),
                        bracket.label()
                    )));
                }
                expected_lower = bracket.upper_kg;
            }
        }
        Ok(())
    }
}

/// Destination offered in the form; only some have a rate sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    pub code: &'static str,
    pub name: &'static str,
}

pub const DESTINATIONS: &[Destination] = &[
    Destination { code: "US", name: "United States" },
    Destination { code: "GB", name: "United Kingdom" },
    Destination { code: "DE", name: "Germany" },
    Destination { code: "CA", name: "Canada" },
    Destination { code: "AU", name: "Australia" },
];

pub const SOURCE_CURRENCY: &str = "CNY";
pub const TARGET_CURRENCY: &str = "USD";
pub const DEFAULT_EXCHANGE_RATE: f64 = 7.2;

/// Flat per-kilogram pricing used instead of the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualRate {
    pub per_kg_fee: f64,
    pub min_charge: f64,
    /// Source-currency units per target-currency unit.
    pub exchange_rate: f64,
}

impl Default for ManualRate {
    fn default() -> Self {
        Self {
            per_kg_fee: 50.0,
            min_charge: 0.0,
            exchange_rate: DEFAULT_EXCHANGE_RATE,
        }
    }
}

/// Everything the calculator needs that does not come from the form.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    pub metric_profiles: Vec<DivisorProfile>,
    pub imperial_profiles: Vec<DivisorProfile>,
    pub rate_sheet: RateSheet,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_sheet(RateSheet::builtin_us())
    }
}

impl Catalog {
    pub fn with_sheet(rate_sheet: RateSheet) -> Self {
        Self {
            metric_profiles: vec![
                DivisorProfile::new("express_5000", "Express courier (÷5000)", 5000.0, WeightUnit::Kilogram),
                DivisorProfile::new("postal_6000", "Postal / economy (÷6000)", 6000.0, WeightUnit::Kilogram),
                DivisorProfile::new("freight_4000", "Air freight (÷4000)", 4000.0, WeightUnit::Kilogram),
            ],
            imperial_profiles: vec![
                DivisorProfile::new("domestic_139", "US domestic (÷139)", 139.0, WeightUnit::Pound),
                DivisorProfile::new("intl_166", "International (÷166)", 166.0, WeightUnit::Pound),
            ],
            rate_sheet,
        }
    }

    /// Parses a rate sheet document and wraps it in a catalog.
    pub fn from_sheet_json(raw: &str) -> Result<Self, CatalogError> {
        let sheet: RateSheet = serde_json::from_str(raw)?;
        sheet.validate()?;
        Ok(Self::with_sheet(sheet))
    }

    pub fn profiles(&self, system: UnitSystem) -> &[DivisorProfile] {
        match system {
            UnitSystem::Metric => &self.metric_profiles,
            UnitSystem::Imperial => &self.imperial_profiles,
        }
    }

    /// Looks `profile_id` up in the profile list of `system`, falling back to
    /// the first entry (or the absolute default) with an advisory.
    pub fn resolve_divisor(&self, system: UnitSystem, profile_id: &str) -> ResolvedDivisor {
        let profiles = self.profiles(system);
        if let Some(profile) = profiles.iter().find(|p| p.id == profile_id) {
            return ResolvedDivisor {
                profile: profile.clone(),
                advisory: None,
            };
        }

        let fallback = profiles
            .first()
            .cloned()
            .unwrap_or_else(DivisorProfile::absolute_default);
        let advisory = Some(format!(
            "Divisor \"{profile_id}\" is not available for {} units; using {}.",
            system.label().to_lowercase(),
            fallback.label
        ));
        ResolvedDivisor {
            profile: fallback,
            advisory,
        }
    }

    pub fn default_profile_id(&self, system: UnitSystem) -> String {
        self.profiles(system)
            .first()
            .map(|p| p.id.clone())
            .unwrap_or_else(|| DivisorProfile::absolute_default().id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("rate sheet asset missing: {0}")]
    MissingAsset(String),
    #[error("rate sheet is invalid: {0}")]
    InvalidSheet(String),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sheet_is_structurally_valid() {
        RateSheet::builtin_us().validate().unwrap();
    }

    #[test]
    fn known_profile_resolves_without_advisory() {
        let catalog = Catalog::default();
        let resolved = catalog.resolve_divisor(UnitSystem::Metric, "postal_6000");
        assert_eq!(resolved.profile.divisor, 6000.0);
        assert!(resolved.advisory.is_none());
    }

    #[test]
    fn profile_from_other_system_falls_back_to_first_entry() {
        let catalog = Catalog::default();
        let resolved = catalog.resolve_divisor(UnitSystem::Imperial, "express_5000");
        assert_eq!(resolved.profile.id, "domestic_139");
        assert_eq!(resolved.profile.weight_unit, WeightUnit::Pound);
        assert!(resolved.advisory.unwrap().contains("imperial"));
    }

    #[test]
    fn empty_profile_list_uses_absolute_default() {
        let mut catalog = Catalog::default();
        catalog.imperial_profiles.clear();
        let resolved = catalog.resolve_divisor(UnitSystem::Imperial, "intl_166");
        assert_eq!(resolved.profile, DivisorProfile::absolute_default());
        assert!(resolved.advisory.is_some());
        assert_eq!(catalog.default_profile_id(UnitSystem::Imperial), "express_5000");
    }

    #[test]
    fn invalid_divisor_is_treated_as_one() {
        let profile = DivisorProfile::new("broken", "Broken", 0.0, WeightUnit::Kilogram);
        assert_eq!(profile.effective_divisor(), 1.0);
    }

    #[test]
    fn gap_between_brackets_is_rejected() {
        let mut sheet = RateSheet::builtin_us();
        sheet.general[2].lower_kg = 0.25;
        assert!(matches!(sheet.validate(), Err(CatalogError::InvalidSheet(_))));
    }

    #[test]
    fn sheet_json_round_trips_through_catalog() {
        let raw = serde_json::to_string(&RateSheet::builtin_us()).unwrap();
        let catalog = Catalog::from_sheet_json(&raw).unwrap();
        assert_eq!(catalog.rate_sheet.jurisdiction, "US");
        assert!(Catalog::from_sheet_json("{ not json").is_err());
    }

    #[test]
    fn bracket_bounds_are_lower_exclusive_upper_inclusive() {
        let bracket = Bracket::new(0.70, 2.00, 91.0, 13.0);
        assert!(!bracket.contains(0.70));
        assert!(bracket.contains(2.00));
        assert!(bracket.contains(1.32));
    }
}
