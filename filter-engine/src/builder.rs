use crate::context::FilterContext;
use crate::dates::date_range_to_condition;
use shared_types::{
    AmountRange, FilterError, FilterNode, FilterParams, FilterTree, RangeCondition, Scalar,
};
use tracing::debug;

/// Output of [`build_filter`]
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFilter {
    pub tree: FilterTree,
    /// The amount bounds in base currency, for consumers that render the
    /// equivalent range without converting again
    pub base_range: AmountRange,
}

/// Builds the query filter tree for the given panel state.
///
/// Shape produced:
///
/// ```text
/// {
///   "date": {"gte": <from|null>, "lte": <to|null>},      // only with a date range
///   "AND": [
///     {"OR": [{"type": "Expense"}, {"type": "Income"}]}, // only with types
///     {"AND": [{"amount": {"gte": min, "lte": max}}, {"currency": "FX"}]}
///   ]
/// }
/// ```
///
/// The amount bounds are converted from display to base currency.
pub fn build_filter(
    params: &FilterParams,
    ctx: &FilterContext<'_>,
) -> Result<BuiltFilter, FilterError> {
    validate_params(params)?;

    let domain = ctx.domain;
    let mut tree = FilterNode::new();

    if let Some(range) = params.date_range.filter(|range| !range.is_empty()) {
        tree.fields
            .insert(domain.date_field.clone(), date_range_to_condition(&range));
    }

    let mut and = Vec::new();

    if !params.types.is_empty() {
        let any_of = params
            .types
            .iter()
            .map(|t| FilterNode::field(domain.type_field.as_str(), Scalar::from(t.as_str())))
            .collect();
        and.push(FilterNode::or_group(any_of));
    }

    let base_range = AmountRange::new(
        ctx.to_base(params.amount_min)?,
        ctx.to_base(params.amount_max)?,
    );
    for amount in [base_range.min, base_range.max] {
        if !amount.is_finite() {
            return Err(FilterError::NonFiniteAmount(amount));
        }
    }

    let mut amount_group = vec![FilterNode::field(
        domain.amount_field.as_str(),
        RangeCondition::between(base_range.min, base_range.max),
    )];
    if let Some(currency) = domain.fixed_currency.as_deref().filter(|c| !c.is_empty()) {
        amount_group.push(FilterNode::field(
            domain.currency_field.as_str(),
            Scalar::from(currency),
        ));
    }
    and.push(FilterNode::and_group(amount_group));

    tree.and = Some(and);

    debug!(
        "Built filter: types={}, base_range=[{}, {}] {}, dated={}",
        params.types.len(),
        base_range.min,
        base_range.max,
        ctx.base_currency,
        tree.has_field(&domain.date_field)
    );

    Ok(BuiltFilter { tree, base_range })
}

fn validate_params(params: &FilterParams) -> Result<(), FilterError> {
    for amount in [params.amount_min, params.amount_max] {
        if !amount.is_finite() {
            return Err(FilterError::NonFiniteAmount(amount));
        }
    }

    if params.amount_min > params.amount_max {
        return Err(FilterError::InvalidAmountRange {
            min: params.amount_min,
            max: params.amount_max,
        });
    }

    if let Some(range) = &params.date_range {
        if let (Some(from), Some(to)) = (range.from, range.to) {
            if from > to {
                return Err(FilterError::InvalidDateRange { from, to });
            }
        }
    }

    Ok(())
}
