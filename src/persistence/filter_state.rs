use super::KeyValueStore;
use crate::error::DashboardResult;
use crate::filter::FilterState;
use crate::models::MealContext;
use log::{debug, warn};

pub const PATIENT_KEY: &str = "glucose_dashboard.filter.patient";
pub const MEAL_CONTEXT_KEY: &str = "glucose_dashboard.filter.meal_context";

/// Rebuild the persisted part of the filter. Missing or malformed entries
/// fall back to no constraint.
pub fn restore_filter<S: KeyValueStore + ?Sized>(store: &S) -> FilterState {
    let patient = read_optional(store, PATIENT_KEY);

    let meal_context = read_optional(store, MEAL_CONTEXT_KEY).and_then(|label| {
        let context = MealContext::from_label(&label);
        if context.is_none() {
            warn!("Ignoring persisted meal context {:?}: not a known context", label);
        }
        context
    });

    let filter = FilterState {
        patient,
        meal_context,
        ..FilterState::default()
    };
    debug!("Restored filter {:?}", filter);
    filter
}

/// Persist the patient and meal-context criteria.
pub fn persist_filter<S: KeyValueStore + ?Sized>(store: &mut S, filter: &FilterState) -> DashboardResult<()> {
    let patient = serde_json::to_string(&filter.patient)?;
    let meal_context = serde_json::to_string(&filter.meal_context.as_ref().map(|c| c.label()))?;

    store.set(PATIENT_KEY, &patient)?;
    store.set(MEAL_CONTEXT_KEY, &meal_context)?;
    Ok(())
}

fn read_optional<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    let raw = store.get(key)?;
    match serde_json::from_str::<Option<String>>(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring malformed persisted value for {}: {}", key, e);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_empty_store_is_unconstrained() {
        let store = MemoryStore::new();
        assert!(restore_filter(&store).is_unconstrained());
    }

    #[test]
    fn test_persist_then_restore() {
        let mut store = MemoryStore::new();
        let filter = FilterState::new()
            .with_patient("P003")
            .with_meal_context(MealContext::BeforeSleep)
            .with_glucose_range(Some(150.0), None);

        persist_filter(&mut store, &filter).unwrap();
        assert_eq!(store.get(PATIENT_KEY), Some("\"P003\"".to_string()));
        assert_eq!(store.get(MEAL_CONTEXT_KEY), Some("\"Before sleep\"".to_string()));

        let restored = restore_filter(&store);
        assert_eq!(restored.patient.as_deref(), Some("P003"));
        assert_eq!(restored.meal_context, Some(MealContext::BeforeSleep));
        // range is session-only
        assert_eq!(restored.min_glucose, None);
    }

    #[test]
    fn test_null_values_restore_as_none() {
        let mut store = MemoryStore::new();
        persist_filter(&mut store, &FilterState::new()).unwrap();
        assert_eq!(store.get(PATIENT_KEY), Some("null".to_string()));
        assert!(restore_filter(&store).is_unconstrained());
    }

    #[test]
    fn test_corrupt_entries_fall_back() {
        let mut store = MemoryStore::new();
        store.set(PATIENT_KEY, "{not json").unwrap();
        store.set(MEAL_CONTEXT_KEY, "42").unwrap();
        assert!(restore_filter(&store).is_unconstrained());

        store.set(PATIENT_KEY, "\"P001\"").unwrap();
        store.set(MEAL_CONTEXT_KEY, "\"Brunch\"").unwrap();
        let restored = restore_filter(&store);
        assert_eq!(restored.patient.as_deref(), Some("P001"));
        assert_eq!(restored.meal_context, None);
    }
}
