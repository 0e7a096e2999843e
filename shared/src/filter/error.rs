use thiserror::Error;

/// Errors raised while evaluating an [`EntityFilter`](crate::EntityFilter)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The filter asks for a datum the entity cannot provide. This is a
    /// misconfigured filter, not a non-match.
    #[error("Entity {entity} does not support filter datum `{datum}`. Disable that datum on the filter or only evaluate it against entities that carry it")]
    UnsupportedDatumForEntity { datum: &'static str, entity: String },
}
