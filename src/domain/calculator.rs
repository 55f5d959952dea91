//! The full pricing pipeline: raw form → normalized inputs → geometry →
//! chargeable weight → rate → currency → unit economics.

use serde::{Deserialize, Serialize};

use super::{
    catalog::{Catalog, DivisorProfile, HandlingClass, ManualRate, DEFAULT_EXCHANGE_RATE},
    economics::{convert_currency, effective_exchange_rate, unit_economics, CostInputs, UnitEconomics},
    rates::{quote_manual, quote_sheet, PricingMode, RateOutcome},
    units::{self, UnitSystem, MONEY_MAX},
    volumetric::{box_metrics, chargeable_weight, BoxDimensions, BoxMetrics},
};

/// Carton construction; drives preview styling and export columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxStyle {
    #[default]
    Mailer,
    Shipper,
    Tuck,
}

impl BoxStyle {
    pub const ALL: [BoxStyle; 3] = [BoxStyle::Mailer, BoxStyle::Shipper, BoxStyle::Tuck];

    pub fn label(&self) -> &'static str {
        match self {
            BoxStyle::Mailer => "Mailer box",
            BoxStyle::Shipper => "Shipping carton",
            BoxStyle::Tuck => "Tuck-end box",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BoxStyle::Mailer => "mailer",
            BoxStyle::Shipper => "shipper",
            BoxStyle::Tuck => "tuck",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.code() == code)
    }
}

/// Raw form state exactly as typed; every number is still a string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorForm {
    pub unit_system: UnitSystem,
    pub box_style: BoxStyle,
    pub pricing_mode: PricingMode,
    pub destination: String,
    pub has_battery: bool,
    pub divisor_id: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub board_mm: String,
    pub actual_weight: String,
    pub quantity: String,
    pub unit_price: String,
    pub product_cost: String,
    pub variable_fee_pct: String,
    pub refund_fee_pct: String,
    pub manual_per_kg: String,
    pub manual_min_charge: String,
    pub exchange_rate: String,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        let manual = ManualRate::default();
        Self {
            unit_system: UnitSystem::Metric,
            box_style: BoxStyle::Mailer,
            pricing_mode: PricingMode::Sheet,
            destination: "US".to_string(),
            has_battery: false,
            divisor_id: "express_5000".to_string(),
            length: "30".to_string(),
            width: "22".to_string(),
            height: "10".to_string(),
            board_mm: "2".to_string(),
            actual_weight: String::new(),
            quantity: "1".to_string(),
            unit_price: "0".to_string(),
            product_cost: "0".to_string(),
            variable_fee_pct: "0".to_string(),
            refund_fee_pct: "0".to_string(),
            manual_per_kg: format!("{}", manual.per_kg_fee),
            manual_min_charge: format!("{}", manual.min_charge),
            exchange_rate: format!("{}", manual.exchange_rate),
        }
    }
}

/// Validated, clamped numbers derived from a [`CalculatorForm`].
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedInputs {
    pub unit_system: UnitSystem,
    pub dimensions: BoxDimensions,
    pub board_mm: f64,
    pub actual_weight: f64,
    pub quantity: u32,
    pub unit_price: f64,
    pub product_cost: f64,
    pub variable_fee_pct: f64,
    pub refund_fee_pct: f64,
    pub manual: ManualRate,
}

pub fn normalize(form: &CalculatorForm) -> NormalizedInputs {
    let system = form.unit_system;
    let board_mm = units::coerce_board_mm(&form.board_mm);
    let exchange_rate = units::parse_number(&form.exchange_rate).unwrap_or(DEFAULT_EXCHANGE_RATE);

    NormalizedInputs {
        unit_system: system,
        dimensions: BoxDimensions {
            length: units::coerce_dimension(&form.length, system),
            width: units::coerce_dimension(&form.width, system),
            height: units::coerce_dimension(&form.height, system),
            board: system.board_from_mm(board_mm),
        },
        board_mm,
        actual_weight: units::coerce_actual_weight(&form.actual_weight),
        quantity: units::coerce_quantity(&form.quantity),
        unit_price: units::coerce_money(&form.unit_price),
        product_cost: units::coerce_money(&form.product_cost),
        variable_fee_pct: units::coerce_percent(&form.variable_fee_pct),
        refund_fee_pct: units::coerce_percent(&form.refund_fee_pct),
        manual: ManualRate {
            per_kg_fee: units::coerce(&form.manual_per_kg, 0.0, MONEY_MAX, 0.0),
            min_charge: units::coerce(&form.manual_min_charge, 0.0, MONEY_MAX, 0.0),
            exchange_rate: effective_exchange_rate(exchange_rate),
        },
    }
}

/// Everything the UI and exports show for one form state.
#[derive(Clone, Debug, PartialEq)]
pub struct Calculation {
    pub inputs: NormalizedInputs,
    pub profile: DivisorProfile,
    /// One-line note when the requested divisor had to be replaced.
    pub advisory: Option<String>,
    pub metrics: BoxMetrics,
    /// In the active weight unit.
    pub chargeable_weight: f64,
    pub chargeable_weight_kg: f64,
    pub rate: RateOutcome,
    pub fee_source: f64,
    pub fee_target: f64,
    pub economics: UnitEconomics,
}

impl Calculation {
    pub fn billed_kg(&self) -> f64 {
        self.rate.billed_kg_or_zero()
    }

    pub fn breakdown(&self) -> String {
        self.rate.describe()
    }
}

pub fn calculate(form: &CalculatorForm, catalog: &Catalog) -> Calculation {
    let inputs = normalize(form);
    let resolved = catalog.resolve_divisor(inputs.unit_system, &form.divisor_id);
    let profile = resolved.profile;

    let metrics = box_metrics(&inputs.dimensions, profile.effective_divisor());
    let chargeable = chargeable_weight(inputs.actual_weight, metrics.volumetric_weight);
    let chargeable_kg = profile.weight_unit.to_kg(chargeable);

    let sheet = &catalog.rate_sheet;
    let rate = match form.pricing_mode {
        PricingMode::Sheet => quote_sheet(
            sheet,
            &form.destination,
            HandlingClass::from_battery_flag(form.has_battery),
            chargeable_kg,
        ),
        PricingMode::Manual => quote_manual(&inputs.manual, chargeable_kg, &sheet.currency),
    };

    let fee_source = rate.fee_or_zero();
    let fee_target = convert_currency(fee_source, inputs.manual.exchange_rate);
    let economics = unit_economics(&CostInputs {
        shipping_fee: fee_target,
        quantity: inputs.quantity,
        unit_price: inputs.unit_price,
        product_cost: inputs.product_cost,
        variable_fee_pct: inputs.variable_fee_pct,
        refund_fee_pct: inputs.refund_fee_pct,
    });

    Calculation {
        inputs,
        profile,
        advisory: resolved.advisory,
        metrics,
        chargeable_weight: chargeable,
        chargeable_weight_kg: chargeable_kg,
        rate,
        fee_source,
        fee_target,
        economics,
    }
}

/// Prices independent forms against the same catalog.
pub fn calculate_many(forms: &[CalculatorForm], catalog: &Catalog) -> Vec<Calculation> {
    forms.iter().map(|form| calculate(form, catalog)).collect()
}
