use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    calculator::{calculate, Calculation, CalculatorForm},
    catalog::Catalog,
    preview::PreviewMode,
    units::UnitSystem,
};

#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Live form contents; every change re-runs the calculator.
    pub form: CalculatorForm,
    /// Loaded once at startup and never mutated.
    pub catalog: Arc<Catalog>,
    pub preview: PreviewMode,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            form: CalculatorForm::default(),
            catalog: Arc::new(catalog),
            preview: PreviewMode::Pending,
        }
    }

    pub fn calculation(&self) -> Calculation {
        calculate(&self.form, &self.catalog)
    }

    /// Switches units and moves the divisor to the new system's default when
    /// the current one does not belong to it.
    pub fn set_unit_system(&mut self, system: UnitSystem) {
        self.form.unit_system = system;
        let known = self
            .catalog
            .profiles(system)
            .iter()
            .any(|profile| profile.id == self.form.divisor_id);
        if !known {
            self.form.divisor_id = self.catalog.default_profile_id(system);
        }
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.form = persisted.form;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            form: self.form.clone(),
        }
    }
}

/// Last-used form, restored on the next launch.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub form: CalculatorForm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_switch_moves_divisor_to_matching_profile() {
        let mut state = AppState::new(Catalog::default());
        state.set_unit_system(UnitSystem::Imperial);
        assert_eq!(state.form.divisor_id, "domestic_139");
        assert!(state.calculation().advisory.is_none());

        state.form.divisor_id = "intl_166".to_string();
        state.set_unit_system(UnitSystem::Imperial);
        assert_eq!(state.form.divisor_id, "intl_166");
    }

    #[test]
    fn persisted_form_round_trips() {
        let mut state = AppState::new(Catalog::default());
        state.form.length = "44".to_string();
        let snapshot = state.to_persisted();
        let mut restored = AppState::new(Catalog::default());
        restored.apply_persisted(snapshot);
        assert_eq!(restored.form.length, "44");
    }

    #[test]
    fn missing_form_fields_fall_back_to_defaults() {
        let persisted: PersistedState = serde_json::from_str(r#"{"form": {"length": "12"}}"#).unwrap();
        assert_eq!(persisted.form.length, "12");
        assert_eq!(persisted.form.destination, "US");
    }
}
