/// What a filter can read from an entity.
///
/// Only the display name is mandatory data. Entities without a subtype read
/// as `-1` and entities that are not drinks read as the empty ingredient set.
pub trait FilterTarget {
    /// Used in diagnostics
    fn describe(&self) -> String;

    /// `None` when the entity has no name at all
    fn display_name(&self) -> Option<&str>;

    fn subtype_index(&self) -> Option<i32> {
        None
    }

    fn ingredients(&self) -> Option<crate::IngredientSet> {
        None
    }
}
