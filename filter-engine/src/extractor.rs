use crate::context::FilterContext;
use crate::dates::date_range_from_condition;
use shared_types::{
    AmountRange, Condition, DateRange, FilterError, FilterNode, FilterParams, FilterTree,
    RangeCondition,
};
use tracing::debug;

/// Reads filter panel state back out of a filter tree.
///
/// Accepts every shape [`build_filter`](crate::build_filter) produces plus the
/// flat and string-dated shapes written by older clients. Unrecognised keys
/// are ignored and missing values fall back to `defaults`; the only error is
/// one raised by the currency converter.
///
/// Precedence rules:
/// - a `baseAmount` bound wins over an `amount` bound from anywhere in the tree;
/// - a `date` inside a root `AND` entry wins over the root `date`, and the last
///   such entry wins over earlier ones.
pub fn extract_filter(
    tree: &FilterTree,
    ctx: &FilterContext<'_>,
    defaults: AmountRange,
) -> Result<FilterParams, FilterError> {
    let mut extraction = Extraction::default();
    let domain = ctx.domain;

    extraction.root_date = tree
        .get(&domain.date_field)
        .and_then(date_range_from_condition);

    match &tree.and {
        Some(entries) => {
            for entry in entries {
                extraction.visit_entry(entry, ctx)?;
            }
        }
        None => extraction.visit_amounts(tree, ctx)?,
    }

    let params = extraction.finish(defaults);

    debug!(
        "Extracted filter: types={:?}, amount=[{}, {}] {}, date_range={:?}",
        params.types, params.amount_min, params.amount_max, ctx.display_currency, params.date_range
    );

    Ok(params)
}

/// Bounds already expressed in display currency
#[derive(Debug, Default, Clone, Copy)]
struct Bounds {
    min: Option<f64>,
    max: Option<f64>,
}

impl Bounds {
    fn overwrite(&mut self, other: Bounds) {
        if other.min.is_some() {
            self.min = other.min;
        }
        if other.max.is_some() {
            self.max = other.max;
        }
    }
}

#[derive(Debug, Default)]
struct Extraction {
    types: Vec<String>,
    /// From `baseAmount`, and from the builder's nested amount group
    base_amount: Bounds,
    plain_amount: Bounds,
    root_date: Option<DateRange>,
    entry_date: Option<DateRange>,
}

impl Extraction {
    fn add_type(&mut self, label: String) {
        if !self.types.contains(&label) {
            self.types.push(label);
        }
    }

    fn visit_entry(
        &mut self,
        entry: &FilterNode,
        ctx: &FilterContext<'_>,
    ) -> Result<(), FilterError> {
        let domain = ctx.domain;

        if let Some(label) = entry
            .get(&domain.type_field)
            .and_then(Condition::as_scalar)
            .and_then(|value| value.to_label())
        {
            self.add_type(label);
        }

        self.visit_amounts(entry, ctx)?;

        if let Some(nested) = &entry.and {
            self.visit_amount_group(nested, ctx)?;
        }

        if let Some(range) = entry
            .get(&domain.date_field)
            .and_then(date_range_from_condition)
        {
            self.entry_date = Some(range);
        }

        if let Some(any_of) = &entry.or {
            if !any_of.is_empty()
                && any_of
                    .iter()
                    .all(|node| node.has_field(&domain.type_field))
            {
                for node in any_of {
                    if let Some(label) = node
                        .get(&domain.type_field)
                        .and_then(Condition::as_scalar)
                        .and_then(|value| value.to_label())
                    {
                        self.add_type(label);
                    }
                }
            }
        }

        Ok(())
    }

    /// `baseAmount` (converted) or else `amount` (as is) on one node
    fn visit_amounts(
        &mut self,
        node: &FilterNode,
        ctx: &FilterContext<'_>,
    ) -> Result<(), FilterError> {
        let domain = ctx.domain;

        if let Some(range) = range_field(node, &domain.base_amount_field) {
            let bounds = to_display(range, ctx)?;
            self.base_amount.overwrite(bounds);
        } else if let Some(range) = range_field(node, &domain.amount_field) {
            self.plain_amount.overwrite(Bounds {
                min: range.lower_f64(),
                max: range.upper_f64(),
            });
        }

        Ok(())
    }

    /// The nested group the builder writes holds base-currency bounds, under
    /// `baseAmount` or, as the builder itself writes them, under `amount`.
    fn visit_amount_group(
        &mut self,
        nested: &[FilterNode],
        ctx: &FilterContext<'_>,
    ) -> Result<(), FilterError> {
        let domain = ctx.domain;

        let base_ranges: Vec<&RangeCondition> = nested
            .iter()
            .filter_map(|node| range_field(node, &domain.base_amount_field))
            .collect();

        let ranges: Vec<&RangeCondition> = if base_ranges.is_empty() {
            nested
                .iter()
                .filter_map(|node| range_field(node, &domain.amount_field))
                .collect()
        } else {
            base_ranges
        };

        for range in ranges {
            let bounds = to_display(range, ctx)?;
            self.base_amount.overwrite(bounds);
        }

        Ok(())
    }

    fn finish(self, defaults: AmountRange) -> FilterParams {
        let amount_min = self
            .base_amount
            .min
            .or(self.plain_amount.min)
            .unwrap_or(defaults.min);
        let amount_max = self
            .base_amount
            .max
            .or(self.plain_amount.max)
            .unwrap_or(defaults.max);

        FilterParams {
            types: self.types,
            amount_min,
            amount_max,
            date_range: self.entry_date.or(self.root_date),
        }
    }
}

fn range_field<'n>(node: &'n FilterNode, name: &str) -> Option<&'n RangeCondition> {
    node.get(name).and_then(Condition::as_range)
}

fn to_display(range: &RangeCondition, ctx: &FilterContext<'_>) -> Result<Bounds, FilterError> {
    let min = range.lower_f64().map(|v| ctx.to_display(v)).transpose()?;
    let max = range.upper_f64().map(|v| ctx.to_display(v)).transpose()?;
    Ok(Bounds { min, max })
}
