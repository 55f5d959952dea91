//! Named snapshots of the calculator and the collection they live in.

use serde::{Deserialize, Serialize};

use super::calculator::{Calculation, CalculatorForm};

/// Derived figures captured at save time, in the units shown back then.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupResults {
    pub volumetric_weight: f64,
    pub chargeable_weight: f64,
    pub chargeable_weight_kg: f64,
    pub weight_unit: String,
    pub shipping_source: f64,
    pub shipping_target: f64,
    pub shipping_per_unit: f64,
    pub cost_per_unit: f64,
    pub total_cost: f64,
    pub breakdown: String,
}

impl From<&Calculation> for SetupResults {
    fn from(calc: &Calculation) -> Self {
        Self {
            volumetric_weight: calc.metrics.volumetric_weight,
            chargeable_weight: calc.chargeable_weight,
            chargeable_weight_kg: calc.chargeable_weight_kg,
            weight_unit: calc.profile.weight_unit.symbol().to_string(),
            shipping_source: calc.fee_source,
            shipping_target: calc.fee_target,
            shipping_per_unit: calc.economics.shipping_per_unit,
            cost_per_unit: calc.economics.cost_per_unit,
            total_cost: calc.economics.total_cost,
            breakdown: calc.breakdown(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedSetup {
    pub id: String,
    pub name: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub form: CalculatorForm,
    pub results: SetupResults,
}

impl SavedSetup {
    pub fn new(id: String, name: &str, created_at: String, form: CalculatorForm, calc: &Calculation) -> Self {
        Self {
            id,
            name: clean_name(name),
            created_at,
            form,
            results: SetupResults::from(calc),
        }
    }
}

pub const UNTITLED_SETUP: &str = "Untitled setup";

/// Trims a user-supplied name, substituting a placeholder for blanks.
pub fn clean_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNTITLED_SETUP.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Ordered setups, newest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetupCollection {
    setups: Vec<SavedSetup>,
}

impl SetupCollection {
    #[cfg(test)]
    pub fn new(setups: Vec<SavedSetup>) -> Self {
        Self { setups }
    }

    pub fn as_slice(&self) -> &[SavedSetup] {
        &self.setups
    }

    pub fn len(&self) -> usize {
        self.setups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setups.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SavedSetup> {
        self.setups.iter().find(|setup| setup.id == id)
    }

    /// Places `setup` at the front.
    pub fn prepend(&mut self, setup: SavedSetup) {
        self.setups.insert(0, setup);
    }

    pub fn remove(&mut self, id: &str) -> Option<SavedSetup> {
        let index = self.setups.iter().position(|setup| setup.id == id)?;
        Some(self.setups.remove(index))
    }

    /// Returns `false` (and changes nothing) when `id` is unknown.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.setups.iter_mut().find(|setup| setup.id == id) {
            Some(setup) => {
                setup.name = clean_name(name);
                true
            }
            None => false,
        }
    }
}

/// Durable home of the saved-setup collection.
///
/// Implementations keep the collection in memory and rewrite storage after
/// every successful mutation.
pub trait SetupRepository {
    type Error;

    fn load_all(&self) -> &SetupCollection;
    fn append(&mut self, setup: SavedSetup) -> Result<(), Self::Error>;
    fn remove(&mut self, id: &str) -> Result<Option<SavedSetup>, Self::Error>;
    fn rename(&mut self, id: &str, name: &str) -> Result<bool, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{calculator::calculate, catalog::Catalog};

    fn setup(id: &str, name: &str) -> SavedSetup {
        let form = CalculatorForm::default();
        let calc = calculate(&form, &Catalog::default());
        SavedSetup::new(id.to_string(), name, "2026-10-19T08:00:00Z".to_string(), form, &calc)
    }

    #[test]
    fn results_capture_the_calculation() {
        let saved = setup("a", "Mailer S");
        assert!((saved.results.shipping_source - 133.12).abs() < 1e-6);
        assert_eq!(saved.results.weight_unit, "kg");
        assert!(saved.results.breakdown.contains("US"));
    }

    #[test]
    fn new_setups_go_to_the_front() {
        let mut collection = SetupCollection::default();
        collection.prepend(setup("a", "first"));
        collection.prepend(setup("b", "second"));
        let ids: Vec<_> = collection.as_slice().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn save_then_delete_restores_prior_state() {
        let mut collection = SetupCollection::new(vec![setup("a", "first")]);
        let before = collection.clone();
        collection.prepend(setup("b", "second"));
        let removed = collection.remove("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(collection, before);
    }

    #[test]
    fn renaming_unknown_id_changes_nothing() {
        let mut collection = SetupCollection::new(vec![setup("a", "first")]);
        let before = collection.clone();
        assert!(!collection.rename("zzz", "other"));
        assert_eq!(collection, before);
    }

    #[test]
    fn rename_trims_and_fills_blank_names() {
        let mut collection = SetupCollection::new(vec![setup("a", "first")]);
        assert!(collection.rename("a", "  Big mailer  "));
        assert_eq!(collection.get("a").unwrap().name, "Big mailer");
        assert!(collection.rename("a", "   "));
        assert_eq!(collection.get("a").unwrap().name, UNTITLED_SETUP);
    }

    #[test]
    fn removing_unknown_id_returns_none() {
        let mut collection = SetupCollection::new(vec![setup("a", "first")]);
        assert!(collection.remove("nope").is_none());
        assert_eq!(collection.len(), 1);
    }
}
