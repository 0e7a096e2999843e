/// Integration tests for entity filters evaluated against real entities

use snapwire_shared::{
    EntityFilter, EntityHandle, FilterDatumType, FilterError, FilterStrength, IngredientSet,
    RespectFilter,
};
use snapwire_test::{HasName, HasSubtype, IsDrink, TestEntity};

fn named(slot: u32, name: &str) -> TestEntity {
    TestEntity::new(EntityHandle::new(slot, 0)).with(HasName::new(name))
}

#[test]
fn suggestion_is_ignored_when_only_requirements_count() {
    let mut filter = EntityFilter::new(FilterStrength::Suggestion, FilterDatumType::NAME);
    filter.set_name("Soda");

    let water = named(1, "Water");
    assert!(filter.matches(&water, RespectFilter::ReqOnly));
    assert!(!filter.matches(&water, RespectFilter::All));
    assert!(filter.matches(&water, RespectFilter::Ignore));
}

#[test]
fn requirement_is_always_enforced_unless_ignored() {
    let mut filter = EntityFilter::new(FilterStrength::Requirement, FilterDatumType::NAME);
    filter.set_name("Soda");

    assert!(!filter.matches(&named(1, "Water"), RespectFilter::ReqOnly));
    assert!(filter.matches(&named(2, "Soda"), RespectFilter::ReqOnly));
    // names compare exactly
    assert!(!filter.matches(&named(3, "soda"), RespectFilter::All));
}

#[test]
fn missing_subtype_never_matches_a_set_subtype() {
    let mut filter = EntityFilter::new(FilterStrength::Requirement, FilterDatumType::SUBTYPE);
    filter.set_subtype(2);

    let plain = named(1, "Cup");
    assert!(!filter.matches(&plain, RespectFilter::All));

    let typed = named(2, "Cup").with(HasSubtype { index: 2 });
    assert!(filter.matches(&typed, RespectFilter::All));
}

#[test]
fn enabled_but_unset_datum_matches_everything() {
    let filter = EntityFilter::new(
        FilterStrength::Requirement,
        FilterDatumType::NAME | FilterDatumType::SUBTYPE,
    );
    assert!(!filter.filter_is_set());
    assert!(filter.matches(&named(1, "Anything"), RespectFilter::All));
}

#[test]
fn filter_copies_entity_values() {
    let drink = IngredientSet::EMPTY.with(0).with(5);
    let source = named(1, "Margarita")
        .with(HasSubtype { index: 4 })
        .with(IsDrink {
            ingredients: drink,
            underlying: None,
        });

    let mut filter = EntityFilter::new(FilterStrength::Requirement, FilterDatumType::all());
    filter.set_filter_with_entity(&source).unwrap();
    assert!(filter.filter_is_set());
    assert_eq!(filter.describe_value(FilterDatumType::NAME), "Margarita");
    assert_eq!(filter.describe_value(FilterDatumType::SUBTYPE), "4");
    assert!(filter.matches(&source, RespectFilter::All));

    let other = named(2, "Margarita")
        .with(HasSubtype { index: 4 })
        .with(IsDrink {
            ingredients: IngredientSet::EMPTY.with(0),
            underlying: None,
        });
    assert!(!filter.matches(&other, RespectFilter::All));
}

#[test]
fn non_drink_reads_as_empty_ingredients() {
    let mut filter = EntityFilter::new(FilterStrength::Requirement, FilterDatumType::INGREDIENTS);
    filter.set_ingredients(IngredientSet::EMPTY);
    assert!(filter.matches(&named(1, "Chair"), RespectFilter::All));
}

#[test]
fn name_filter_on_nameless_entity_is_an_error() {
    let mut filter = EntityFilter::new(FilterStrength::Requirement, FilterDatumType::NAME);
    filter.set_name("Soda");
    let nameless = TestEntity::new(EntityHandle::new(9, 0));

    let result = filter.try_matches(&nameless, RespectFilter::All);
    assert!(matches!(
        result,
        Err(FilterError::UnsupportedDatumForEntity { datum: "Name", .. })
    ));
    // skipped entirely when the caller ignores filters
    assert_eq!(filter.try_matches(&nameless, RespectFilter::Ignore), Ok(true));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "does not support filter datum")]
fn misconfigured_filter_panics_in_debug_builds() {
    let mut filter = EntityFilter::new(FilterStrength::Requirement, FilterDatumType::NAME);
    filter.set_name("Soda");
    filter.matches(&TestEntity::new(EntityHandle::new(9, 0)), RespectFilter::All);
}
