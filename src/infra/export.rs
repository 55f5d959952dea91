//! Snapshot (JSON) and tabular (CSV) exports, written into the user's
//! download folder.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use crate::domain::{
    calculator::{normalize, Calculation, CalculatorForm},
    catalog::Catalog,
    rates::RateOutcome,
    setups::SavedSetup,
    SOURCE_CURRENCY, TARGET_CURRENCY,
};

pub const CSV_HEADER: [&str; 23] = [
    "name",
    "jurisdiction",
    "pricing_mode",
    "unit_system",
    "box_style",
    "length",
    "width",
    "height",
    "board_mm",
    "divisor_id",
    "battery",
    "quantity",
    "price",
    "product_cost",
    "variable_fee_pct",
    "refund_fee_pct",
    "chargeable_weight_kg",
    "shipping_cny",
    "shipping_usd",
    "shipping_per_unit",
    "cost_per_unit",
    "total_cost",
    "breakdown",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnapshotDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub inner: [f64; 3],
    pub unit: &'static str,
}

/// One computed setup with a fixed field set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SetupSnapshot {
    pub name: String,
    pub exported_at: String,
    pub jurisdiction: String,
    pub pricing_mode: &'static str,
    pub unit_system: &'static str,
    pub box_style: &'static str,
    pub dimensions: SnapshotDimensions,
    pub board_mm: f64,
    pub divisor_id: String,
    pub divisor: f64,
    pub battery: bool,
    pub quantity: u32,
    pub price: f64,
    pub product_cost: f64,
    pub variable_fee_pct: f64,
    pub refund_fee_pct: f64,
    pub volumetric_weight: f64,
    pub chargeable_weight: f64,
    pub weight_unit: &'static str,
    pub chargeable_weight_kg: f64,
    pub billed_weight_kg: f64,
    pub rate_status: &'static str,
    pub shipping_source: f64,
    pub source_currency: &'static str,
    pub shipping_target: f64,
    pub target_currency: &'static str,
    pub shipping_per_unit: f64,
    pub cost_per_unit: f64,
    pub total_cost: f64,
    pub breakdown: String,
}

fn rate_status(outcome: &RateOutcome) -> &'static str {
    match outcome {
        RateOutcome::Quoted(_) => "quoted",
        RateOutcome::Unsupported { .. } => "unsupported",
        RateOutcome::Failed(_) => "failed",
    }
}

pub fn snapshot(name: &str, exported_at: String, form: &CalculatorForm, calc: &Calculation) -> SetupSnapshot {
    let inputs = &calc.inputs;
    SetupSnapshot {
        name: name.trim().to_string(),
        exported_at,
        jurisdiction: form.destination.clone(),
        pricing_mode: form.pricing_mode.code(),
        unit_system: inputs.unit_system.code(),
        box_style: form.box_style.code(),
        dimensions: SnapshotDimensions {
            length: inputs.dimensions.length,
            width: inputs.dimensions.width,
            height: inputs.dimensions.height,
            inner: calc.metrics.inner,
            unit: inputs.unit_system.length_unit(),
        },
        board_mm: inputs.board_mm,
        divisor_id: calc.profile.id.clone(),
        divisor: calc.profile.divisor,
        battery: form.has_battery,
        quantity: inputs.quantity,
        price: inputs.unit_price,
        product_cost: inputs.product_cost,
        variable_fee_pct: inputs.variable_fee_pct,
        refund_fee_pct: inputs.refund_fee_pct,
        volumetric_weight: calc.metrics.volumetric_weight,
        chargeable_weight: calc.chargeable_weight,
        weight_unit: calc.profile.weight_unit.symbol(),
        chargeable_weight_kg: calc.chargeable_weight_kg,
        billed_weight_kg: calc.billed_kg(),
        rate_status: rate_status(&calc.rate),
        shipping_source: calc.fee_source,
        source_currency: SOURCE_CURRENCY,
        shipping_target: calc.fee_target,
        target_currency: TARGET_CURRENCY,
        shipping_per_unit: calc.economics.shipping_per_unit,
        cost_per_unit: calc.economics.cost_per_unit,
        total_cost: calc.economics.total_cost,
        breakdown: calc.breakdown(),
    }
}

pub fn snapshot_json(snapshot: &SetupSnapshot) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

fn setup_row(setup: &SavedSetup, catalog: &Catalog) -> Vec<String> {
    let form = &setup.form;
    let inputs = normalize(form);
    let divisor = catalog.resolve_divisor(inputs.unit_system, &form.divisor_id);
    let results = &setup.results;
    vec![
        setup.name.clone(),
        form.destination.clone(),
        form.pricing_mode.code().to_string(),
        form.unit_system.code().to_string(),
        form.box_style.code().to_string(),
        format!("{:.2}", inputs.dimensions.length),
        format!("{:.2}", inputs.dimensions.width),
        format!("{:.2}", inputs.dimensions.height),
        format!("{:.1}", inputs.board_mm),
        divisor.profile.id,
        form.has_battery.to_string(),
        inputs.quantity.to_string(),
        format!("{:.2}", inputs.unit_price),
        format!("{:.2}", inputs.product_cost),
        format!("{:.2}", inputs.variable_fee_pct),
        format!("{:.2}", inputs.refund_fee_pct),
        format!("{:.3}", results.chargeable_weight_kg),
        format!("{:.2}", results.shipping_source),
        format!("{:.2}", results.shipping_target),
        format!("{:.4}", results.shipping_per_unit),
        format!("{:.4}", results.cost_per_unit),
        format!("{:.2}", results.total_cost),
        results.breakdown.clone(),
    ]
}

/// Renders all setups as CSV; fields with commas, quotes or newlines are quoted.
/// The divisor column names the profile the setup is actually priced with.
pub fn setups_csv(setups: &[SavedSetup], catalog: &Catalog) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for setup in setups {
        writer.write_record(setup_row(setup, catalog))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Where exports land: Downloads, else the local data dir, else the cwd.
pub fn export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join("boxrate")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `boxrate-<stem>-YYYYMMDD-HHMMSS.<ext>`
pub fn export_file_name(stem: &str, extension: &str, at: OffsetDateTime) -> String {
    let slug: String = stem
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "export" } else { slug };
    format!(
        "boxrate-{slug}-{:04}{:02}{:02}-{:02}{:02}{:02}.{extension}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
    )
}

pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    info!(target: "boxrate::export", path = %path.display(), bytes = contents.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{calculate, PricingMode, UnitSystem};
    use time::macros::datetime;

    fn saved(name: &str, form: CalculatorForm) -> SavedSetup {
        let calc = calculate(&form, &Catalog::default());
        SavedSetup::new("id-1".to_string(), name, "2026-10-19T08:00:00Z".to_string(), form, &calc)
    }

    #[test]
    fn csv_starts_with_the_fixed_header() {
        let csv = setups_csv(&[], &Catalog::default()).unwrap();
        assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
    }

    #[test]
    fn csv_row_carries_stored_results() {
        let csv = setups_csv(&[saved("Small mailer", CalculatorForm::default())], &Catalog::default()).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Small mailer");
        assert_eq!(&record[1], "US");
        assert_eq!(&record[2], "sheet");
        assert_eq!(&record[16], "1.320");
        assert_eq!(&record[17], "133.12");
        assert_eq!(record.len(), CSV_HEADER.len());
    }

    #[test]
    fn csv_divisor_column_names_the_resolved_profile() {
        let form = CalculatorForm {
            unit_system: UnitSystem::Imperial,
            divisor_id: "express_5000".to_string(),
            ..CalculatorForm::default()
        };
        let csv = setups_csv(&[saved("Imperial mailer", form)], &Catalog::default()).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[3], "imperial");
        assert_eq!(&record[9], "domestic_139");
    }

    #[test]
    fn awkward_names_are_quoted_with_doubled_quotes() {
        let csv = setups_csv(&[saved("Box \"A\", v2\nlarge", CalculatorForm::default())], &Catalog::default()).unwrap();
        let line = csv.lines().nth(1).unwrap();
        assert!(line.starts_with("\"Box \"\"A\"\", v2"), "{line}");
    }

    #[test]
    fn snapshot_reports_unsupported_routes_explicitly() {
        let form = CalculatorForm {
            destination: "GB".to_string(),
            pricing_mode: PricingMode::Sheet,
            ..CalculatorForm::default()
        };
        let calc = calculate(&form, &Catalog::default());
        let snap = snapshot("uk", "2026-10-19T08:00:00Z".to_string(), &form, &calc);
        assert_eq!(snap.rate_status, "unsupported");
        assert_eq!(snap.shipping_source, 0.0);

        let json: serde_json::Value = serde_json::from_str(&snapshot_json(&snap).unwrap()).unwrap();
        assert_eq!(json["jurisdiction"], "GB");
        assert_eq!(json["dimensions"]["unit"], "cm");
    }

    #[test]
    fn file_names_are_slugged_and_timestamped() {
        let at = datetime!(2026-10-19 08:05:09 UTC);
        assert_eq!(
            export_file_name("My Setup/1", "json", at),
            "boxrate-my-setup-1-20261019-080509.json"
        );
        assert_eq!(export_file_name("  ", "csv", at), "boxrate-export-20261019-080509.csv");
    }

    #[test]
    fn exports_are_written_to_the_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(&dir.path().join("out"), "x.csv", "a,b\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "a,b\n");
    }
}
