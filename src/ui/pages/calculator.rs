use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::update_state,
    domain::{
        calculate,
        setups::clean_name,
        AppState, BoxStyle, Calculation, CalculatorForm, HandlingClass, PricingMode, SavedSetup, SetupRepository,
        UnitSystem, DESTINATIONS, SOURCE_CURRENCY, TARGET_CURRENCY,
    },
    infra::{
        export::{export_dir, export_file_name, snapshot, snapshot_json, write_export},
        storage::JsonSetupRepository,
    },
    ui::{
        components::{
            box_preview::BoxPreview,
            field::{NumberField, ToggleGroup},
            kpi_card::KpiCard,
            rate_badge::RateBadge,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::{generate_uuid, now_rfc3339},
};

type FieldAccess = fn(&mut CalculatorForm) -> &mut String;

/// Event handler writing the typed text into one form field.
fn text_setter(state: Signal<AppState>, field: FieldAccess) -> impl FnMut(String) + 'static {
    move |value| update_state(state, |st| *field(&mut st.form) = value)
}

fn unit_options() -> Vec<(String, String)> {
    [UnitSystem::Metric, UnitSystem::Imperial]
        .into_iter()
        .map(|system| (system.code().to_string(), system.label().to_string()))
        .collect()
}

fn pricing_options() -> Vec<(String, String)> {
    [PricingMode::Sheet, PricingMode::Manual]
        .into_iter()
        .map(|mode| (mode.code().to_string(), mode.label().to_string()))
        .collect()
}

#[component]
pub fn CalculatorPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let repository = use_context::<Signal<JsonSetupRepository>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut setup_name = use_signal(String::new);

    let (form, preview, catalog) = state.with(|st| (st.form.clone(), st.preview, st.catalog.clone()));
    let calc = calculate(&form, &catalog);
    let system = form.unit_system;
    let length_unit = system.length_unit();
    let weight_unit = calc.profile.weight_unit.symbol();
    let (min_dim, max_dim) = system.dimension_bounds();
    let dim_hint = format!("{min_dim}–{max_dim}");
    let priced_jurisdiction = catalog.rate_sheet.jurisdiction.clone();
    let profiles = catalog.profiles(system).to_vec();
    let ceiling_note = (form.pricing_mode == PricingMode::Sheet && calc.rate.is_priced())
        .then(|| catalog.rate_sheet.max_weight_kg(HandlingClass::from_battery_flag(form.has_battery)))
        .flatten()
        .filter(|max_kg| calc.billed_kg() > *max_kg)
        .map(|max_kg| format!("Billed weight is above the {max_kg} kg table ceiling; the last bracket applies."));

    let save_setup = move |_: MouseEvent| {
        let name = setup_name();
        let (form, calc) = state.with(|st| (st.form.clone(), st.calculation()));
        let setup = SavedSetup::new(generate_uuid(), &name, now_rfc3339(), form, &calc);
        let label = setup.name.clone();
        let mut repository = repository;
        match repository.with_mut(|repo| repo.append(setup)) {
            Ok(()) => {
                setup_name.set(String::new());
                push_toast(toasts, ToastKind::Success, format!("Saved \"{label}\"."));
            }
            Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not save setup: {err}")),
        }
    };

    let export_current = move |_: MouseEvent| {
        let name = clean_name(&setup_name());
        let (form, calc) = state.with(|st| (st.form.clone(), st.calculation()));
        let exported = snapshot(&name, now_rfc3339(), &form, &calc);
        let file_name = export_file_name(&name, "json", OffsetDateTime::now_utc());
        let written = snapshot_json(&exported)
            .and_then(|json| write_export(&export_dir(), &file_name, &json));
        match written {
            Ok(path) => push_toast(toasts, ToastKind::Success, format!("Exported to {}", path.display())),
            Err(err) => push_toast(toasts, ToastKind::Error, format!("Export failed: {err}")),
        }
    };

    rsx! {
        div { class: "calculator",
            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Carton" }
                ToggleGroup {
                    options: unit_options(),
                    selected: system.code().to_string(),
                    on_select: move |code: String| {
                        if let Some(system) = UnitSystem::from_code(&code) {
                            update_state(state, |st| st.set_unit_system(system));
                        }
                    },
                }
                label { class: "field",
                    span { class: "field-label", "Style" }
                    select {
                        class: theme::SELECT,
                        onchange: move |evt| {
                            if let Some(style) = BoxStyle::from_code(&evt.value()) {
                                update_state(state, |st| st.form.box_style = style);
                            }
                        },
                        for style in BoxStyle::ALL {
                            option {
                                key: "{style.code()}",
                                value: style.code(),
                                selected: style == form.box_style,
                                "{style.label()}"
                            }
                        }
                    }
                }
                div { class: theme::GRID_3,
                    NumberField {
                        label: "Length",
                        value: form.length.clone(),
                        unit: length_unit.to_string(),
                        placeholder: dim_hint.clone(),
                        on_input: text_setter(state, |f| &mut f.length),
                    }
                    NumberField {
                        label: "Width",
                        value: form.width.clone(),
                        unit: length_unit.to_string(),
                        placeholder: dim_hint.clone(),
                        on_input: text_setter(state, |f| &mut f.width),
                    }
                    NumberField {
                        label: "Height",
                        value: form.height.clone(),
                        unit: length_unit.to_string(),
                        placeholder: dim_hint.clone(),
                        on_input: text_setter(state, |f| &mut f.height),
                    }
                }
                div { class: theme::GRID_2,
                    NumberField {
                        label: "Board thickness",
                        value: form.board_mm.clone(),
                        unit: "mm".to_string(),
                        on_input: text_setter(state, |f| &mut f.board_mm),
                    }
                    NumberField {
                        label: "Actual weight",
                        value: form.actual_weight.clone(),
                        unit: weight_unit.to_string(),
                        placeholder: "optional".to_string(),
                        on_input: text_setter(state, |f| &mut f.actual_weight),
                    }
                }
                p { class: theme::MUTED,
                    {format!(
                        "Inner {:.1} × {:.1} × {:.1} {length_unit} · surface {:.0} {}",
                        calc.metrics.inner[0],
                        calc.metrics.inner[1],
                        calc.metrics.inner[2],
                        calc.metrics.surface_area,
                        system.area_unit(),
                    )}
                }
            }

            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Shipping" }
                div { class: theme::GRID_2,
                    label { class: "field",
                        span { class: "field-label", "Divisor" }
                        select {
                            class: theme::SELECT,
                            onchange: move |evt| update_state(state, |st| st.form.divisor_id = evt.value()),
                            for profile in profiles {
                                option {
                                    key: "{profile.id}",
                                    value: "{profile.id}",
                                    selected: profile.id == calc.profile.id,
                                    "{profile.label}"
                                }
                            }
                        }
                    }
                    label { class: "field",
                        span { class: "field-label", "Destination" }
                        select {
                            class: theme::SELECT,
                            onchange: move |evt| update_state(state, |st| st.form.destination = evt.value()),
                            for destination in DESTINATIONS {
                                option {
                                    key: "{destination.code}",
                                    value: destination.code,
                                    selected: destination.code == form.destination,
                                    if destination.code.eq_ignore_ascii_case(&priced_jurisdiction) {
                                        "{destination.name}"
                                    } else {
                                        "{destination.name} (no rate sheet)"
                                    }
                                }
                            }
                        }
                    }
                }
                label { class: "field field-inline",
                    input {
                        r#type: "checkbox",
                        checked: form.has_battery,
                        onchange: move |evt| update_state(state, |st| st.form.has_battery = evt.checked()),
                    }
                    span { "Contains batteries" }
                }
                ToggleGroup {
                    options: pricing_options(),
                    selected: form.pricing_mode.code().to_string(),
                    on_select: move |code: String| {
                        if let Some(mode) = PricingMode::from_code(&code) {
                            update_state(state, |st| st.form.pricing_mode = mode);
                        }
                    },
                }
                div { class: theme::GRID_3,
                    if form.pricing_mode == PricingMode::Manual {
                        NumberField {
                            label: "Per kg",
                            value: form.manual_per_kg.clone(),
                            unit: SOURCE_CURRENCY.to_string(),
                            on_input: text_setter(state, |f| &mut f.manual_per_kg),
                        }
                        NumberField {
                            label: "Minimum charge",
                            value: form.manual_min_charge.clone(),
                            unit: SOURCE_CURRENCY.to_string(),
                            on_input: text_setter(state, |f| &mut f.manual_min_charge),
                        }
                    }
                    NumberField {
                        label: "Exchange rate",
                        value: form.exchange_rate.clone(),
                        unit: format!("{SOURCE_CURRENCY}/{TARGET_CURRENCY}"),
                        on_input: text_setter(state, |f| &mut f.exchange_rate),
                    }
                }
            }

            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Unit economics" }
                div { class: theme::GRID_3,
                    NumberField {
                        label: "Quantity",
                        value: form.quantity.clone(),
                        on_input: text_setter(state, |f| &mut f.quantity),
                    }
                    NumberField {
                        label: "Unit price",
                        value: form.unit_price.clone(),
                        unit: TARGET_CURRENCY.to_string(),
                        on_input: text_setter(state, |f| &mut f.unit_price),
                    }
                    NumberField {
                        label: "Product cost",
                        value: form.product_cost.clone(),
                        unit: TARGET_CURRENCY.to_string(),
                        on_input: text_setter(state, |f| &mut f.product_cost),
                    }
                    NumberField {
                        label: "Variable fees",
                        value: form.variable_fee_pct.clone(),
                        unit: "%".to_string(),
                        on_input: text_setter(state, |f| &mut f.variable_fee_pct),
                    }
                    NumberField {
                        label: "Refund allowance",
                        value: form.refund_fee_pct.clone(),
                        unit: "%".to_string(),
                        on_input: text_setter(state, |f| &mut f.refund_fee_pct),
                    }
                }
            }

            Results { calc: calc.clone(), weight_unit, ceiling_note }

            section { class: "{theme::PANEL} results-side",
                BoxPreview {
                    mode: preview,
                    style: form.box_style,
                    length: calc.inputs.dimensions.length,
                    width: calc.inputs.dimensions.width,
                    height: calc.inputs.dimensions.height,
                }
                div { class: "save-row",
                    input {
                        class: theme::INPUT,
                        placeholder: "Setup name",
                        value: "{setup_name}",
                        oninput: move |evt| setup_name.set(evt.value()),
                    }
                    button { class: theme::BTN_PRIMARY, onclick: save_setup, "Save setup" }
                    button { class: theme::BTN_SECONDARY, onclick: export_current, "Export JSON" }
                }
            }
        }
    }
}

#[component]
fn Results(calc: Calculation, weight_unit: &'static str, ceiling_note: Option<String>) -> Element {
    let volume_unit = calc.inputs.unit_system.volume_unit();
    let economics = calc.economics;
    rsx! {
        section { class: theme::PANEL,
            div { class: "results-head",
                h2 { class: theme::PANEL_TITLE, "Results" }
                RateBadge { outcome: calc.rate.clone() }
            }
            div { class: "kpi-grid",
                KpiCard {
                    title: "Volumetric weight",
                    value: format!("{:.3} {weight_unit}", calc.metrics.volumetric_weight),
                    description: format!(
                        "{:.0} {volume_unit} ÷ {}",
                        calc.metrics.outer_volume,
                        calc.profile.effective_divisor()
                    ),
                }
                KpiCard {
                    title: "Chargeable weight",
                    value: format!("{:.3} {weight_unit}", calc.chargeable_weight),
                    description: format!(
                        "{:.3} kg, billed {:.3} kg",
                        calc.chargeable_weight_kg,
                        calc.billed_kg()
                    ),
                }
                KpiCard {
                    title: "Shipping",
                    value: format!("{:.2} {SOURCE_CURRENCY}", calc.fee_source),
                    description: format!("{:.2} {TARGET_CURRENCY}", calc.fee_target),
                }
                KpiCard {
                    title: "Cost per unit",
                    value: format!("{:.2} {TARGET_CURRENCY}", economics.cost_per_unit),
                    description: format!("shipping {:.2} per unit", economics.shipping_per_unit),
                }
                KpiCard {
                    title: "Total cost",
                    value: format!("{:.2} {TARGET_CURRENCY}", economics.total_cost),
                    description: format!("{} units", calc.inputs.quantity),
                }
            }
            p { class: "breakdown", "{calc.breakdown()}" }
            if let Some(advisory) = calc.advisory.clone() {
                p { class: "advisory", "{advisory}" }
            }
            if let Some(note) = ceiling_note {
                p { class: "advisory", "{note}" }
            }
        }
    }
}
