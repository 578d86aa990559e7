//! Per-constraint placement verdicts.

use std::collections::BTreeSet;

use berth_model::{Attribute, Constraint, ConstraintKind, Veto};
use tracing::{error, trace};

use crate::matcher::{matches_limit, matches_value};
use crate::{AttributeAggregate, FilterError};

/// Gets the veto (if any) that `constraint` casts against a host.
///
/// All host attributes named like the constraint are merged into one value
/// set. A limit constraint vetoes any host that does not report the attribute
/// at all, since the limit cannot be checked there.
///
/// Returns `Ok(None)` when the host is acceptable for this constraint.
///
/// # Errors
///
/// [`FilterError::UnrecognizedConstraint`] if the constraint body is neither
/// a value nor a limit constraint.
pub fn veto(
    aggregate: &dyn AttributeAggregate,
    host_attributes: &[Attribute],
    constraint: &Constraint,
) -> Result<Option<Veto>, FilterError> {
    let kind = constraint.kind().map_err(|e| {
        error!(constraint = %constraint.name, error = %e, "Unrecognized constraint type");
        FilterError::from(e)
    })?;

    let mut present = false;
    let mut observed = BTreeSet::new();
    for attribute in host_attributes
        .iter()
        .filter(|a| a.name == constraint.name)
    {
        present = true;
        observed.extend(attribute.values.iter().cloned());
    }

    let result = match kind {
        ConstraintKind::Value(value) => {
            (!matches_value(&observed, value)).then(|| Veto::constraint_mismatch(&constraint.name))
        }
        ConstraintKind::Limit(limit) => {
            let satisfied =
                present && matches_limit(&constraint.name, &observed, limit.limit, aggregate);
            (!satisfied).then(|| Veto::unsatisfied_limit(&constraint.name))
        }
    };

    trace!(
        constraint = %constraint.name,
        attribute_present = present,
        vetoed = result.is_some(),
        "Evaluated constraint"
    );

    Ok(result)
}
