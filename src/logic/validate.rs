use chrono::Utc;

use crate::error::FormError;
use crate::logic::engine::FormEngine;
use crate::model::{FormPhase, Snapshot};

pub struct SubmissionValidator;

impl SubmissionValidator {
    /// Check that the form can be submitted. Checks run in a fixed order and
    /// the first failure is reported.
    pub fn validate(engine: &FormEngine) -> Result<(), FormError> {
        if engine.selected_category().is_none() || engine.selected_subcategory().is_none() {
            return Err(FormError::MissingCategorySelection);
        }

        // Fields still belong to the previous subcategory until a load lands
        if engine.phase() == FormPhase::SubcategoryChosen {
            return Err(FormError::PropertiesNotLoaded);
        }

        if engine.properties().is_empty() {
            return Err(FormError::NoPropertiesAvailable);
        }

        if !engine.has_values() {
            return Err(FormError::NoValuesSelected);
        }

        Ok(())
    }

    /// Validate and build the snapshot without touching engine state
    pub fn build_snapshot(engine: &FormEngine) -> Result<Snapshot, FormError> {
        Self::validate(engine)?;

        let (Some(category), Some(subcategory)) =
            (engine.selected_category(), engine.selected_subcategory())
        else {
            return Err(FormError::MissingCategorySelection);
        };

        Ok(Snapshot {
            category: category.clone(),
            subcategory: subcategory.clone(),
            values: engine.ordered_values(),
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::model::{Category, FieldValue, Property, PropertyOption};

    fn engine_with(properties: Vec<Property>) -> FormEngine {
        let mut engine = FormEngine::with_categories(vec![
            Category::new(1, "Electronics", None),
            Category::new(2, "Phones", Some(1)),
            Category::new(3, "Laptops", Some(1)),
        ]);
        engine.select_category(1).unwrap();
        let request = engine.select_subcategory(2).unwrap();
        engine.apply_properties(&request, Ok(properties)).unwrap();
        engine
    }

    fn brand() -> Property {
        Property::new(10, "Brand").with_options(vec![PropertyOption::new(20, "Apple", true)])
    }

    #[test]
    fn test_missing_category() {
        let mut engine = FormEngine::with_categories(vec![Category::new(1, "Electronics", None)]);
        assert_eq!(engine.submit(), Err(FormError::MissingCategorySelection));

        engine.select_category(1).unwrap();
        assert_eq!(engine.submit(), Err(FormError::MissingCategorySelection));
    }

    #[test]
    fn test_no_properties() {
        let mut engine = engine_with(vec![]);
        assert_eq!(engine.submit(), Err(FormError::NoPropertiesAvailable));
    }

    #[test]
    fn test_no_values() {
        let mut engine = engine_with(vec![brand()]);
        assert_eq!(engine.submit(), Err(FormError::NoValuesSelected));
        assert_eq!(engine.phase(), FormPhase::PropertiesLoaded);
        assert_eq!(engine.field_ids(), vec![10]);
    }

    #[test]
    fn test_snapshot_follows_field_order() {
        let mut engine = engine_with(vec![
            Property::new(3, "Condition"),
            brand(),
            Property::new(5, "Color"),
        ]);

        engine.set_field_value(5, FieldValue::Other("Black".into())).unwrap();
        let request = engine.choose_option(10, 20).unwrap().unwrap();
        engine.apply_children(&request, Ok(vec![Property::new(30, "Model")]));
        engine.set_field_value(30, FieldValue::Other("15 Pro".into())).unwrap();

        let snapshot = engine.submit().unwrap();
        assert_eq!(engine.phase(), FormPhase::Submitted);
        assert_eq!(snapshot.category.name, "Electronics");
        assert_eq!(snapshot.subcategory.name, "Phones");

        // Condition has no value and is left out
        let ids: Vec<i64> = snapshot.values.iter().map(|v| v.property_id()).collect();
        assert_eq!(ids, vec![10, 30, 5]);
        assert_eq!(
            snapshot.rows(),
            vec![
                "Category: Electronics",
                "Subcategory: Phones",
                "Brand: Apple",
                "Model: Other: 15 Pro",
                "Color: Other: Black",
            ]
        );
    }

    #[test]
    fn test_pending_subcategory_switch_blocks_submit() {
        let mut engine = engine_with(vec![brand()]);
        engine.set_field_value(10, FieldValue::Other("Sony".into())).unwrap();

        let request = engine.select_subcategory(3).unwrap();
        assert_eq!(engine.submit(), Err(FormError::PropertiesNotLoaded));

        engine
            .apply_properties(&request, Ok(vec![Property::new(40, "CPU")]))
            .unwrap();
        assert_eq!(engine.submit(), Err(FormError::NoValuesSelected));
    }

    #[test]
    fn test_failed_subcategory_switch_blocks_submit() {
        let mut engine = engine_with(vec![brand()]);
        engine.set_field_value(10, FieldValue::Other("Sony".into())).unwrap();

        let request = engine.select_subcategory(3).unwrap();
        engine
            .apply_properties(&request, Err(GatewayError::EmptyResponseBody))
            .unwrap_err();

        // Old Phones fields are still shown but cannot be submitted as Laptops
        assert_eq!(engine.field_ids(), vec![10]);
        assert_eq!(engine.submit(), Err(FormError::PropertiesNotLoaded));
        assert_eq!(engine.phase(), FormPhase::SubcategoryChosen);
    }

    #[test]
    fn test_editing_after_submit_reopens_form() {
        let mut engine = engine_with(vec![brand()]);
        engine.set_field_value(10, FieldValue::Other("Sony".into())).unwrap();
        engine.submit().unwrap();

        engine.set_field_value(10, FieldValue::Other("Sony Xperia".into())).unwrap();
        assert_eq!(engine.phase(), FormPhase::PropertiesLoaded);
    }
}
