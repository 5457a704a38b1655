use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{FormError, GatewayError};
use crate::logic::validate::SubmissionValidator;
use crate::model::{
    subcategories_of, top_level_categories, Category, Choice, FieldValue, FormPhase, Id, Property,
    PropertyOption, SelectedValue, Snapshot,
};

/// Tag attached to every outstanding fetch. A response is applied only while
/// its ticket is still the live one for the state it was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

/// Pending `fetch_properties` issued by `select_subcategory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesRequest {
    pub ticket: Ticket,
    pub subcategory_id: Id,
}

/// Pending `fetch_option_properties` issued by `on_option_chosen`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRequest {
    pub ticket: Ticket,
    pub property_id: Id,
    pub option_id: Id,
}

/// The field and option that caused a child field to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOrigin {
    pub property_id: Id,
    pub option_id: Id,
}

/// A property placed in the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub property: Property,
    /// `None` for top-level properties of the subcategory
    pub origin: Option<FieldOrigin>,
}

impl Field {
    pub fn id(&self) -> Id {
        self.property.id
    }

    pub fn is_child_of(&self, property_id: Id) -> bool {
        self.origin
            .as_ref()
            .is_some_and(|o| o.property_id == property_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertiesOutcome {
    Applied,
    /// Response belonged to a subcategory that is no longer selected
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildrenOutcome {
    /// Ids of the fields inserted after the parent, in order
    Inserted(Vec<Id>),
    Failed(GatewayError),
    Stale,
}

/// State of one form session.
///
/// Every transition is a plain method call without I/O. Operations that need
/// data from the catalog return a request; the caller performs the fetch and
/// hands the result back through `apply_properties` / `apply_children`.
#[derive(Debug, Clone, Default)]
pub struct FormEngine {
    categories: Vec<Category>,
    selected_category: Option<Category>,
    subcategories: Vec<Category>,
    selected_subcategory: Option<Category>,
    properties: Vec<Property>,
    fields: Vec<Field>,
    values: HashMap<Id, SelectedValue>,
    phase: FormPhase,
    next_ticket: u64,
    pending_properties: Option<PropertiesRequest>,
    pending_children: HashMap<Id, ChildRequest>,
}

impl FormEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        let mut engine = Self::new();
        engine.load_categories(categories);
        engine
    }

    /// Install the category set for this session and start over
    pub fn load_categories(&mut self, categories: Vec<Category>) {
        log::debug!("Loaded {} categories", categories.len());
        self.categories = categories;
        self.selected_category = None;
        self.subcategories.clear();
        self.reset_subcategory();
        self.phase = FormPhase::Empty;
    }

    pub fn select_category(&mut self, category_id: Id) -> Result<&[Category], FormError> {
        let category = self
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
            .ok_or(FormError::UnknownCategory(category_id))?;

        self.subcategories = subcategories_of(&self.categories, category.id);
        log::debug!(
            "Category {} selected, {} subcategories",
            category.id,
            self.subcategories.len()
        );
        self.selected_category = Some(category);
        self.reset_subcategory();
        self.phase = FormPhase::CategoryChosen;

        Ok(&self.subcategories)
    }

    /// Select a subcategory of the current category. Fields from an earlier
    /// load stay until the returned request is applied.
    pub fn select_subcategory(&mut self, subcategory_id: Id) -> Result<PropertiesRequest, FormError> {
        if self.selected_category.is_none() {
            return Err(FormError::MissingCategorySelection);
        }

        let subcategory = self
            .subcategories
            .iter()
            .find(|c| c.id == subcategory_id)
            .cloned()
            .ok_or(FormError::UnknownSubcategory(subcategory_id))?;

        self.selected_subcategory = Some(subcategory);
        self.pending_children.clear();

        let request = PropertiesRequest {
            ticket: self.issue_ticket(),
            subcategory_id,
        };
        self.pending_properties = Some(request.clone());
        self.phase = FormPhase::SubcategoryChosen;

        Ok(request)
    }

    pub fn apply_properties(
        &mut self,
        request: &PropertiesRequest,
        result: Result<Vec<Property>, GatewayError>,
    ) -> Result<PropertiesOutcome, FormError> {
        if self.pending_properties.as_ref() != Some(request) {
            log::debug!(
                "Dropping stale properties response for subcategory {}",
                request.subcategory_id
            );
            return Ok(PropertiesOutcome::Stale);
        }
        self.pending_properties = None;

        let properties = match result {
            Ok(properties) => properties,
            Err(e) => {
                log::warn!(
                    "Failed to load properties for subcategory {}: {}",
                    request.subcategory_id,
                    e
                );
                return Err(FormError::Gateway(e));
            }
        };

        self.fields = properties
            .iter()
            .unique_by(|p| p.id)
            .map(|p| Field {
                property: p.clone(),
                origin: None,
            })
            .collect();
        self.properties = properties;
        self.values.clear();
        self.pending_children.clear();
        self.phase = FormPhase::PropertiesLoaded;

        log::debug!(
            "Subcategory {} loaded with {} fields",
            request.subcategory_id,
            self.fields.len()
        );
        Ok(PropertiesOutcome::Applied)
    }

    /// Record the value of a field. Changing the chosen option removes every
    /// field that was inserted because of the previous one.
    pub fn set_field_value(&mut self, property_id: Id, value: FieldValue) -> Result<(), FormError> {
        let index = self
            .field_index(property_id)
            .ok_or(FormError::UnknownField(property_id))?;
        let property = self.fields[index].property.clone();

        let value = match value {
            FieldValue::Option(option) => {
                let known = property.find_option(option.id).cloned().ok_or(
                    FormError::UnknownOption {
                        property_id,
                        option_id: option.id,
                    },
                )?;
                FieldValue::Option(known)
            }
            other => other,
        };

        let previous_option = self.value_of(property_id).and_then(|v| v.value.option_id());
        if previous_option != value.option_id() {
            self.pending_children.remove(&property_id);
            self.remove_descendants(property_id);
        }

        if value.is_unset() {
            self.values.remove(&property_id);
        } else {
            self.values
                .insert(property_id, SelectedValue::new(property, value));
        }

        if self.phase == FormPhase::Submitted {
            self.phase = FormPhase::PropertiesLoaded;
        }
        Ok(())
    }

    /// Returns the child-properties request to issue when `option` unlocks
    /// further fields
    pub fn on_option_chosen(
        &mut self,
        property_id: Id,
        option: &PropertyOption,
    ) -> Result<Option<ChildRequest>, FormError> {
        let field = self
            .field(property_id)
            .ok_or(FormError::UnknownField(property_id))?;
        let option = field
            .property
            .find_option(option.id)
            .cloned()
            .ok_or(FormError::UnknownOption {
                property_id,
                option_id: option.id,
            })?;

        if !option.has_children {
            return Ok(None);
        }

        let request = ChildRequest {
            ticket: self.issue_ticket(),
            property_id,
            option_id: option.id,
        };
        self.pending_children.insert(property_id, request.clone());
        Ok(Some(request))
    }

    /// `set_field_value` followed by `on_option_chosen`, the sequence a
    /// dropdown pick triggers
    pub fn choose_option(
        &mut self,
        property_id: Id,
        option_id: Id,
    ) -> Result<Option<ChildRequest>, FormError> {
        let field = self
            .field(property_id)
            .ok_or(FormError::UnknownField(property_id))?;
        let option = field
            .property
            .find_option(option_id)
            .cloned()
            .ok_or(FormError::UnknownOption {
                property_id,
                option_id,
            })?;

        self.set_field_value(property_id, FieldValue::Option(option.clone()))?;
        self.on_option_chosen(property_id, &option)
    }

    /// Splice child fields in right after their parent. Failures add nothing.
    pub fn apply_children(
        &mut self,
        request: &ChildRequest,
        result: Result<Vec<Property>, GatewayError>,
    ) -> ChildrenOutcome {
        let live = self.pending_children.get(&request.property_id) == Some(request)
            && self.value_of(request.property_id).and_then(|v| v.value.option_id())
                == Some(request.option_id);
        if !live {
            log::debug!(
                "Dropping stale child properties for option {} of property {}",
                request.option_id,
                request.property_id
            );
            return ChildrenOutcome::Stale;
        }
        self.pending_children.remove(&request.property_id);

        let children = match result {
            Ok(children) => children,
            Err(e) => {
                log::warn!(
                    "Failed to load child properties for option {}: {}",
                    request.option_id,
                    e
                );
                return ChildrenOutcome::Failed(e);
            }
        };

        let Some(parent_index) = self.field_index(request.property_id) else {
            return ChildrenOutcome::Stale;
        };

        let origin = FieldOrigin {
            property_id: request.property_id,
            option_id: request.option_id,
        };
        let mut inserted = Vec::new();
        let mut at = parent_index + 1;
        for child in children {
            if self.field_index(child.id).is_some() {
                log::warn!(
                    "Property {} is already part of the form, not inserting it again",
                    child.id
                );
                continue;
            }
            inserted.push(child.id);
            self.fields.insert(
                at,
                Field {
                    property: child,
                    origin: Some(origin.clone()),
                },
            );
            at += 1;
        }

        log::debug!(
            "Inserted {} child fields after property {}",
            inserted.len(),
            request.property_id
        );
        ChildrenOutcome::Inserted(inserted)
    }

    /// Validate and freeze the current selection
    pub fn submit(&mut self) -> Result<Snapshot, FormError> {
        let snapshot = SubmissionValidator::build_snapshot(self)?;
        self.phase = FormPhase::Submitted;
        Ok(snapshot)
    }

    // --- accessors ---

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn top_level_categories(&self) -> Vec<Category> {
        top_level_categories(&self.categories)
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category.as_ref()
    }

    pub fn subcategories(&self) -> &[Category] {
        &self.subcategories
    }

    pub fn selected_subcategory(&self) -> Option<&Category> {
        self.selected_subcategory.as_ref()
    }

    /// Top-level properties of the selected subcategory
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_ids(&self) -> Vec<Id> {
        self.fields.iter().map(Field::id).collect()
    }

    pub fn field(&self, property_id: Id) -> Option<&Field> {
        self.fields.iter().find(|f| f.id() == property_id)
    }

    pub fn choices(&self, property_id: Id) -> Result<Vec<Choice>, FormError> {
        self.field(property_id)
            .map(|f| f.property.choices())
            .ok_or(FormError::UnknownField(property_id))
    }

    pub fn value_of(&self, property_id: Id) -> Option<&SelectedValue> {
        self.values.get(&property_id)
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    /// Selected values in field order; fields without a value are skipped
    pub fn ordered_values(&self) -> Vec<SelectedValue> {
        self.fields
            .iter()
            .filter_map(|f| self.values.get(&f.id()).cloned())
            .collect()
    }

    pub fn pending_request_count(&self) -> usize {
        self.pending_properties.iter().count() + self.pending_children.len()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_request_count() > 0
    }

    // --- internals ---

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    fn field_index(&self, property_id: Id) -> Option<usize> {
        self.fields.iter().position(|f| f.id() == property_id)
    }

    fn reset_subcategory(&mut self) {
        self.selected_subcategory = None;
        self.properties.clear();
        self.fields.clear();
        self.values.clear();
        self.pending_properties = None;
        self.pending_children.clear();
    }

    /// Remove every field inserted, directly or transitively, because of
    /// `property_id`, together with its value and pending request
    fn remove_descendants(&mut self, property_id: Id) {
        let mut doomed: HashSet<Id> = HashSet::new();
        let mut frontier = vec![property_id];

        while let Some(parent) = frontier.pop() {
            for field in self.fields.iter().filter(|f| f.is_child_of(parent)) {
                if doomed.insert(field.id()) {
                    frontier.push(field.id());
                }
            }
        }

        if doomed.is_empty() {
            return;
        }

        self.fields.retain(|f| !doomed.contains(&f.id()));
        for id in &doomed {
            self.values.remove(id);
            self.pending_children.remove(id);
        }
        log::debug!(
            "Removed {} descendant fields of property {}",
            doomed.len(),
            property_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category::new(1, "Electronics", None),
            Category::new(2, "Phones", Some(1)),
            Category::new(3, "Laptops", Some(1)),
            Category::new(4, "Vehicles", None),
            Category::new(5, "Cars", Some(4)),
        ]
    }

    fn brand() -> Property {
        Property::new(10, "Brand").with_options(vec![
            PropertyOption::new(20, "Apple", true),
            PropertyOption::new(21, "Samsung", true),
            PropertyOption::new(22, "Nokia", false),
        ])
    }

    fn model() -> Property {
        Property::new(30, "Model").with_options(vec![PropertyOption::new(40, "15 Pro", true)])
    }

    fn loaded_engine(properties: Vec<Property>) -> FormEngine {
        let mut engine = FormEngine::with_categories(categories());
        engine.select_category(1).unwrap();
        let request = engine.select_subcategory(2).unwrap();
        assert_eq!(
            engine.apply_properties(&request, Ok(properties)).unwrap(),
            PropertiesOutcome::Applied
        );
        engine
    }

    #[test]
    fn test_select_category_computes_subcategories() {
        let mut engine = FormEngine::with_categories(categories());
        assert_eq!(engine.phase(), FormPhase::Empty);

        let names: Vec<String> = engine
            .select_category(1)
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["Phones", "Laptops"]);
        assert_eq!(engine.phase(), FormPhase::CategoryChosen);

        assert_eq!(
            engine.select_category(99),
            Err(FormError::UnknownCategory(99))
        );
        assert_eq!(engine.selected_category().map(|c| c.id), Some(1));
    }

    #[test]
    fn test_changing_category_clears_previous_form() {
        let mut engine = loaded_engine(vec![brand()]);
        engine.set_field_value(10, FieldValue::Other("Sony".into())).unwrap();
        assert!(engine.has_values());

        engine.select_category(4).unwrap();

        assert_eq!(engine.subcategories().iter().map(|c| c.id).collect::<Vec<_>>(), vec![5]);
        assert!(engine.selected_subcategory().is_none());
        assert!(engine.fields().is_empty());
        assert!(engine.properties().is_empty());
        assert!(!engine.has_values());
        assert_eq!(engine.phase(), FormPhase::CategoryChosen);
    }

    #[test]
    fn test_subcategory_requires_category() {
        let mut engine = FormEngine::with_categories(categories());
        assert_eq!(
            engine.select_subcategory(2),
            Err(FormError::MissingCategorySelection)
        );

        engine.select_category(1).unwrap();
        assert_eq!(
            engine.select_subcategory(5),
            Err(FormError::UnknownSubcategory(5))
        );
    }

    #[test]
    fn test_properties_become_fields_in_response_order() {
        let engine = loaded_engine(vec![model(), brand()]);
        assert_eq!(engine.field_ids(), vec![30, 10]);
        assert_eq!(engine.phase(), FormPhase::PropertiesLoaded);
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_duplicate_properties_are_collapsed() {
        let engine = loaded_engine(vec![brand(), model(), brand()]);
        assert_eq!(engine.field_ids(), vec![10, 30]);
    }

    #[test]
    fn test_reload_clears_values() {
        let mut engine = loaded_engine(vec![brand()]);
        engine.set_field_value(10, FieldValue::Other("Sony".into())).unwrap();

        let request = engine.select_subcategory(3).unwrap();
        // Previous fields stay visible while loading
        assert_eq!(engine.field_ids(), vec![10]);
        assert!(engine.is_loading());

        engine.apply_properties(&request, Ok(vec![model()])).unwrap();
        assert_eq!(engine.field_ids(), vec![30]);
        assert!(!engine.has_values());
    }

    #[test]
    fn test_properties_failure_keeps_prior_state() {
        let mut engine = loaded_engine(vec![brand()]);
        engine.set_field_value(10, FieldValue::Other("Sony".into())).unwrap();

        let request = engine.select_subcategory(3).unwrap();
        let err = engine
            .apply_properties(&request, Err(GatewayError::EmptyResponseBody))
            .unwrap_err();

        assert_eq!(err, FormError::Gateway(GatewayError::EmptyResponseBody));
        assert_eq!(engine.field_ids(), vec![10]);
        assert!(engine.value_of(10).is_some());
        assert_eq!(engine.phase(), FormPhase::SubcategoryChosen);
    }

    #[test]
    fn test_first_load_failure_leaves_no_fields() {
        let mut engine = FormEngine::with_categories(categories());
        engine.select_category(1).unwrap();
        let request = engine.select_subcategory(2).unwrap();

        let result = engine.apply_properties(
            &request,
            Err(GatewayError::NetworkUnreachable("offline".into())),
        );
        assert!(matches!(
            result,
            Err(FormError::Gateway(GatewayError::NetworkUnreachable(_)))
        ));
        assert!(engine.fields().is_empty());
    }

    #[test]
    fn test_stale_properties_response_is_dropped() {
        let mut engine = FormEngine::with_categories(categories());
        engine.select_category(1).unwrap();
        let phones = engine.select_subcategory(2).unwrap();
        let laptops = engine.select_subcategory(3).unwrap();

        assert_eq!(
            engine.apply_properties(&phones, Ok(vec![brand()])).unwrap(),
            PropertiesOutcome::Stale
        );
        assert!(engine.fields().is_empty());

        engine.apply_properties(&laptops, Ok(vec![model()])).unwrap();
        assert_eq!(engine.field_ids(), vec![30]);
        assert_eq!(engine.selected_subcategory().map(|c| c.id), Some(3));
    }

    #[test]
    fn test_properties_response_after_category_change_is_dropped() {
        let mut engine = FormEngine::with_categories(categories());
        engine.select_category(1).unwrap();
        let request = engine.select_subcategory(2).unwrap();
        engine.select_category(4).unwrap();

        assert_eq!(
            engine.apply_properties(&request, Ok(vec![brand()])).unwrap(),
            PropertiesOutcome::Stale
        );
        assert!(engine.fields().is_empty());
    }

    #[test]
    fn test_children_inserted_right_after_parent() {
        let color = Property::new(50, "Color");
        let storage = Property::new(51, "Storage");
        let mut engine = loaded_engine(vec![brand(), color, storage]);

        let request = engine.choose_option(10, 20).unwrap().expect("Apple has children");
        assert_eq!(request.option_id, 20);

        let outcome = engine.apply_children(
            &request,
            Ok(vec![Property::new(30, "Model"), Property::new(31, "Year")]),
        );
        assert_eq!(outcome, ChildrenOutcome::Inserted(vec![30, 31]));
        assert_eq!(engine.field_ids(), vec![10, 30, 31, 50, 51]);

        let origin = engine.field(31).and_then(|f| f.origin.clone()).unwrap();
        assert_eq!(
            origin,
            FieldOrigin {
                property_id: 10,
                option_id: 20
            }
        );
    }

    #[test]
    fn test_nested_children_stay_depth_first() {
        let mut engine = loaded_engine(vec![brand(), Property::new(50, "Color")]);

        let request = engine.choose_option(10, 20).unwrap().unwrap();
        engine.apply_children(&request, Ok(vec![model(), Property::new(31, "Year")]));

        let request = engine.choose_option(30, 40).unwrap().unwrap();
        engine.apply_children(&request, Ok(vec![Property::new(60, "Capacity")]));

        assert_eq!(engine.field_ids(), vec![10, 30, 60, 31, 50]);
    }

    #[test]
    fn test_option_without_children_issues_no_request() {
        let mut engine = loaded_engine(vec![brand()]);
        assert_eq!(engine.choose_option(10, 22).unwrap(), None);
        assert!(!engine.is_loading());
        assert_eq!(engine.value_of(10).unwrap().display_name(), "Nokia");
    }

    #[test]
    fn test_changing_option_cascades_removal() {
        let mut engine = loaded_engine(vec![brand(), Property::new(50, "Color")]);

        let request = engine.choose_option(10, 20).unwrap().unwrap();
        engine.apply_children(&request, Ok(vec![model()]));
        let request = engine.choose_option(30, 40).unwrap().unwrap();
        engine.apply_children(&request, Ok(vec![Property::new(60, "Capacity")]));
        engine.set_field_value(60, FieldValue::Other("256GB".into())).unwrap();
        assert_eq!(engine.field_ids(), vec![10, 30, 60, 50]);

        let request = engine.choose_option(10, 21).unwrap().unwrap();
        assert_eq!(engine.field_ids(), vec![10, 50]);
        assert!(engine.value_of(30).is_none());
        assert!(engine.value_of(60).is_none());

        engine.apply_children(&request, Ok(vec![Property::new(35, "Galaxy Model")]));
        assert_eq!(engine.field_ids(), vec![10, 35, 50]);
    }

    #[test]
    fn test_switching_to_other_removes_children() {
        let mut engine = loaded_engine(vec![brand()]);
        let request = engine.choose_option(10, 20).unwrap().unwrap();
        engine.apply_children(&request, Ok(vec![model()]));

        engine.set_field_value(10, FieldValue::Other("Pixel".into())).unwrap();
        assert_eq!(engine.field_ids(), vec![10]);
        assert_eq!(engine.value_of(10).unwrap().display_name(), "Other: Pixel");
    }

    #[test]
    fn test_stale_child_response_is_dropped() {
        let mut engine = loaded_engine(vec![brand()]);
        let apple = engine.choose_option(10, 20).unwrap().unwrap();
        let samsung = engine.choose_option(10, 21).unwrap().unwrap();

        assert_eq!(
            engine.apply_children(&apple, Ok(vec![model()])),
            ChildrenOutcome::Stale
        );
        assert_eq!(engine.field_ids(), vec![10]);

        assert_eq!(
            engine.apply_children(&samsung, Ok(vec![Property::new(35, "Galaxy Model")])),
            ChildrenOutcome::Inserted(vec![35])
        );
    }

    #[test]
    fn test_child_response_after_unset_is_dropped() {
        let mut engine = loaded_engine(vec![brand()]);
        let request = engine.choose_option(10, 20).unwrap().unwrap();
        engine.set_field_value(10, FieldValue::Unset).unwrap();

        assert_eq!(
            engine.apply_children(&request, Ok(vec![model()])),
            ChildrenOutcome::Stale
        );
        assert_eq!(engine.field_ids(), vec![10]);
        assert!(engine.value_of(10).is_none());
    }

    #[test]
    fn test_child_failure_adds_nothing() {
        let mut engine = loaded_engine(vec![brand()]);
        let request = engine.choose_option(10, 20).unwrap().unwrap();

        let outcome = engine.apply_children(&request, Err(GatewayError::EmptyResponseBody));
        assert_eq!(outcome, ChildrenOutcome::Failed(GatewayError::EmptyResponseBody));
        assert_eq!(engine.field_ids(), vec![10]);
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_child_already_in_form_is_skipped() {
        let mut engine = loaded_engine(vec![brand(), model()]);
        let request = engine.choose_option(10, 20).unwrap().unwrap();

        let outcome = engine.apply_children(
            &request,
            Ok(vec![model(), Property::new(31, "Year")]),
        );
        assert_eq!(outcome, ChildrenOutcome::Inserted(vec![31]));
        assert_eq!(engine.field_ids(), vec![10, 31, 30]);
    }

    #[test]
    fn test_set_value_validates_structure() {
        let mut engine = loaded_engine(vec![brand()]);

        assert_eq!(
            engine.set_field_value(77, FieldValue::Other("x".into())),
            Err(FormError::UnknownField(77))
        );
        assert_eq!(
            engine.set_field_value(10, FieldValue::Option(PropertyOption::new(999, "Fake", false))),
            Err(FormError::UnknownOption {
                property_id: 10,
                option_id: 999
            })
        );
        assert!(!engine.has_values());
    }

    #[test]
    fn test_unset_removes_value() {
        let mut engine = loaded_engine(vec![brand()]);
        engine.choose_option(10, 22).unwrap();
        assert!(engine.has_values());

        engine.set_field_value(10, FieldValue::Unset).unwrap();
        assert!(!engine.has_values());
    }

    #[test]
    fn test_option_value_uses_catalog_definition() {
        let mut engine = loaded_engine(vec![brand()]);
        // Caller passes a stale copy without the children flag
        engine
            .set_field_value(10, FieldValue::Option(PropertyOption::new(20, "apple", false)))
            .unwrap();

        let option = engine.value_of(10).unwrap().value.option().cloned().unwrap();
        assert_eq!(option.name, "Apple");
        assert!(option.has_children);
    }

    #[test]
    fn test_choices_for_field() {
        let engine = loaded_engine(vec![brand()]);
        let labels: Vec<String> = engine
            .choices(10)
            .unwrap()
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        assert_eq!(labels, vec!["Apple", "Samsung", "Nokia", "Other"]);
        assert_eq!(engine.choices(1), Err(FormError::UnknownField(1)));
    }
}
