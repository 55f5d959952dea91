use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::{update_state, Route},
    domain::{calculate_many, AppState, Calculation, CalculatorForm, SavedSetup, SetupRepository},
    infra::{
        export::{export_dir, export_file_name, setups_csv, write_export},
        storage::JsonSetupRepository,
    },
    ui::{
        components::{
            setup_table::{SetupRow, SetupTable},
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::short_timestamp,
};

/// Table row for `setup`, with `current` being the same form repriced now.
fn setup_row(setup: &SavedSetup, current: &Calculation) -> SetupRow {
    let dims = &current.inputs.dimensions;
    SetupRow {
        id: setup.id.clone(),
        name: setup.name.clone(),
        created: short_timestamp(&setup.created_at),
        summary: format!(
            "{:.1} × {:.1} × {:.1} {} · {} · {}",
            dims.length,
            dims.width,
            dims.height,
            current.inputs.unit_system.length_unit(),
            setup.form.destination,
            setup.form.box_style.label(),
        ),
        stored_total: setup.results.total_cost,
        current_total: current.economics.total_cost,
    }
}

#[component]
pub fn SetupsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let repository = use_context::<Signal<JsonSetupRepository>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    let setups = repository.with(|repo| repo.load_all().as_slice().to_vec());
    let catalog = state.with(|st| st.catalog.clone());
    let forms: Vec<CalculatorForm> = setups.iter().map(|setup| setup.form.clone()).collect();
    let repriced = calculate_many(&forms, &catalog);
    let rows: Vec<SetupRow> = setups
        .iter()
        .zip(&repriced)
        .map(|(setup, current)| setup_row(setup, current))
        .collect();
    let nothing_saved = repository.with(|repo| repo.load_all().is_empty());
    let location = repository.with(|repo| repo.path().map(|path| path.display().to_string()));

    let on_load = move |id: String| {
        let found = repository.with(|repo| repo.load_all().get(&id).cloned());
        match found {
            Some(setup) => {
                update_state(state, |st| st.form = setup.form.clone());
                push_toast(toasts, ToastKind::Info, format!("Loaded \"{}\".", setup.name));
                nav.push(Route::Calculator {});
            }
            None => push_toast(toasts, ToastKind::Warning, "That setup no longer exists."),
        }
    };

    let on_rename = move |(id, name): (String, String)| {
        let mut repository = repository;
        match repository.with_mut(|repo| repo.rename(&id, &name)) {
            Ok(true) => push_toast(toasts, ToastKind::Success, "Setup renamed."),
            Ok(false) => push_toast(toasts, ToastKind::Warning, "That setup no longer exists."),
            Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not rename setup: {err}")),
        }
    };

    let on_delete = move |id: String| {
        let mut repository = repository;
        match repository.with_mut(|repo| repo.remove(&id)) {
            Ok(Some(removed)) => {
                push_toast(toasts, ToastKind::Success, format!("Deleted \"{}\".", removed.name))
            }
            Ok(None) => push_toast(toasts, ToastKind::Warning, "That setup no longer exists."),
            Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not delete setup: {err}")),
        }
    };

    let export_all = move |_: MouseEvent| {
        let setups = repository.with(|repo| repo.load_all().as_slice().to_vec());
        let catalog = state.with(|st| st.catalog.clone());
        let file_name = export_file_name("setups", "csv", OffsetDateTime::now_utc());
        let written = setups_csv(&setups, &catalog).and_then(|csv| write_export(&export_dir(), &file_name, &csv));
        match written {
            Ok(path) => push_toast(
                toasts,
                ToastKind::Success,
                format!("Exported {} setups to {}", setups.len(), path.display()),
            ),
            Err(err) => push_toast(toasts, ToastKind::Error, format!("Export failed: {err}")),
        }
    };

    rsx! {
        section { class: theme::PANEL,
            div { class: "results-head",
                h2 { class: theme::PANEL_TITLE, "Saved setups" }
                button {
                    class: theme::BTN_SECONDARY,
                    disabled: nothing_saved,
                    onclick: export_all,
                    "Export CSV"
                }
            }
            p { class: theme::MUTED,
                "Totals are in USD. \"Now\" reprices each setup against the current rate sheet."
            }
            SetupTable { rows, on_load, on_rename, on_delete }
            match location {
                Some(location) => rsx! { p { class: theme::MUTED, "Stored in {location}" } },
                None => rsx! { p { class: theme::MUTED, "No storage directory available; setups cannot be saved." } },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{calculate, Catalog};

    #[test]
    fn rows_compare_stored_and_repriced_totals() {
        let form = CalculatorForm {
            quantity: "10".to_string(),
            ..CalculatorForm::default()
        };
        let catalog = Catalog::default();
        let at_save = calculate(&form, &catalog);
        let mut setup = SavedSetup::new(
            "id-1".to_string(),
            "Mailer",
            "2026-10-19T08:05:09Z".to_string(),
            form,
            &at_save,
        );
        setup.results.total_cost += 1.0;

        let now = calculate(&setup.form, &catalog);
        let row = setup_row(&setup, &now);
        assert_eq!(row.created, "2026-10-19 08:05");
        assert_eq!(row.summary, "30.0 × 22.0 × 10.0 cm · US · Mailer box");
        assert!((row.current_total - at_save.economics.total_cost).abs() < 1e-9);
        assert!(row.drifted());
    }
}
