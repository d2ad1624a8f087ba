use shared_types::{Condition, FilterEdit, FilterNode, FilterTree};
use tracing::trace;

/// Appends one condition to `tree[comparator]`, creating the group if needed.
///
/// Strictly additive: editing the same target twice keeps both conditions.
/// The condition appended is
///
/// - `{target: value}`
/// - `{target: {sub_target: value}}` with a sub-target
/// - `{operator: {...tree[operator], target: ...}}` with an operator, merged
///   into the group already stored under `operator` at the root
pub fn edit_filter(tree: &FilterTree, edit: &FilterEdit) -> FilterTree {
    let mut next = tree.clone();
    let condition = edit_condition(tree, edit);

    trace!(
        "Appending filter condition to {}: {:?}",
        edit.comparator.key(),
        condition
    );

    next.group_mut(edit.comparator)
        .get_or_insert_with(Vec::new)
        .push(condition);
    next
}

/// Like [`edit_filter`], but first drops the single-field conditions in
/// `tree[comparator]` that constrain the same target, so applying the same
/// edit twice leaves one condition.
pub fn set_filter(tree: &FilterTree, edit: &FilterEdit) -> FilterTree {
    let mut next = tree.clone();
    let condition = edit_condition(tree, edit);

    let entries = next.group_mut(edit.comparator).get_or_insert_with(Vec::new);
    let before = entries.len();
    entries.retain(|entry| !constrains_same_target(entry, edit));

    trace!(
        "Replacing {} filter condition(s) in {} for {}",
        before - entries.len(),
        edit.comparator.key(),
        edit.target
    );

    entries.push(condition);
    next
}

fn edit_condition(tree: &FilterTree, edit: &FilterEdit) -> FilterNode {
    let leaf: Condition = match &edit.sub_target {
        Some(sub_target) => FilterNode::field(sub_target.as_str(), edit.value.clone()).into(),
        None => edit.value.clone().into(),
    };

    match &edit.operator {
        Some(operator) => {
            let group = tree
                .get(operator)
                .and_then(Condition::as_nested)
                .cloned()
                .unwrap_or_default();
            FilterNode::field(operator.as_str(), group.with_field(edit.target.as_str(), leaf))
        }
        None => FilterNode::field(edit.target.as_str(), leaf),
    }
}

fn constrains_same_target(entry: &FilterNode, edit: &FilterEdit) -> bool {
    if entry.and.is_some() || entry.or.is_some() || entry.fields.len() != 1 {
        return false;
    }

    let node = match &edit.operator {
        Some(operator) => match entry.get(operator).and_then(Condition::as_nested) {
            Some(group) => group,
            None => return false,
        },
        None => entry,
    };

    match (node.get(&edit.target), &edit.sub_target) {
        (Some(Condition::Nested(inner)), Some(sub_target)) => inner.has_field(sub_target),
        (Some(Condition::Value(_)), None) => true,
        _ => false,
    }
}
