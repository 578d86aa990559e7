//! Attribute value checks used by constraint evaluation.

use std::collections::BTreeSet;

use berth_model::ValueConstraint;

use crate::AttributeAggregate;

/// Checks observed attribute values against a value constraint.
///
/// A plain constraint needs at least one shared value; a negated one needs
/// none.
pub fn matches_value(observed: &BTreeSet<String>, constraint: &ValueConstraint) -> bool {
    let intersects = !observed.is_disjoint(&constraint.values);
    intersects != constraint.negated
}

/// Checks that every value of attribute `name` is held by fewer than `limit`
/// of the job's instances.
///
/// An attribute with no values passes.
pub fn matches_limit<'a, I>(
    name: &str,
    values: I,
    limit: u32,
    aggregate: &dyn AttributeAggregate,
) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .all(|value| aggregate.instances_with_attribute(name, value) < u64::from(limit))
}
