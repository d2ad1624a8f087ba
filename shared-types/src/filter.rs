//! Filter tree wire model.
//!
//! A filter tree is the boolean predicate handed to the transaction query API:
//! a JSON object whose `AND` / `OR` keys hold ordered child nodes and whose
//! remaining keys are field conditions. Trees may be authored by other clients,
//! so conversion from JSON is total: shapes this model does not recognise are
//! kept verbatim as [`Condition::Raw`] and written back unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use ts_rs::TS;

pub const AND_KEY: &str = "AND";
pub const OR_KEY: &str = "OR";
pub const GTE_KEY: &str = "gte";
pub const LTE_KEY: &str = "lte";

/// Largest integer a JavaScript number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Boolean comparator joining the entries of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
pub enum Comparator {
    #[default]
    And,
    Or,
}

impl Comparator {
    pub fn key(&self) -> &'static str {
        match self {
            Comparator::And => AND_KEY,
            Comparator::Or => OR_KEY,
        }
    }
}

/// Scalar value of a field condition
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Scalar {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Scalar::Number),
            Value::String(s) => Some(Scalar::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => number_value(*n),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Text shown for this value in a select control. `null` has no label.
    pub fn to_label(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Number(_) => Some(self.to_value().to_string()),
            Scalar::String(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Scalar::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("expected a string, number, boolean or null"))
    }
}

/// JSON number written the way the web client writes it: integral values
/// without a fractional part.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Inclusive `{gte, lte}` bounds. A missing side is unbounded; an explicit
/// `null` side is kept as `Some(Scalar::Null)` so it round-trips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeCondition {
    pub gte: Option<Scalar>,
    pub lte: Option<Scalar>,
}

impl RangeCondition {
    pub fn new(gte: Option<Scalar>, lte: Option<Scalar>) -> Self {
        Self { gte, lte }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            gte: Some(Scalar::Number(min)),
            lte: Some(Scalar::Number(max)),
        }
    }

    pub fn lower_f64(&self) -> Option<f64> {
        self.gte.as_ref().and_then(Scalar::as_f64)
    }

    pub fn upper_f64(&self) -> Option<f64> {
        self.lte.as_ref().and_then(Scalar::as_f64)
    }

    /// Recognises a non-empty object whose keys are all `gte` / `lte` with
    /// scalar values.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        if map.is_empty() {
            return None;
        }

        let mut range = RangeCondition::default();
        for (key, value) in map {
            let bound = Scalar::from_value(value)?;
            match key.as_str() {
                GTE_KEY => range.gte = Some(bound),
                LTE_KEY => range.lte = Some(bound),
                _ => return None,
            }
        }

        Some(range)
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(gte) = &self.gte {
            map.insert(GTE_KEY.to_string(), gte.to_value());
        }
        if let Some(lte) = &self.lte {
            map.insert(LTE_KEY.to_string(), lte.to_value());
        }
        Value::Object(map)
    }
}

/// Constraint attached to one field name
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Value(Scalar),
    Range(RangeCondition),
    /// Relation or operator filter, e.g. `{"wallet": {"name": "Gold"}}`
    Nested(FilterNode),
    Raw(Value),
}

impl Condition {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => match RangeCondition::from_map(&map) {
                Some(range) => Condition::Range(range),
                None => Condition::Nested(FilterNode::from_map(map)),
            },
            Value::Array(_) => Condition::Raw(value),
            scalar => Scalar::from_value(&scalar)
                .map(Condition::Value)
                .unwrap_or(Condition::Raw(scalar)),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Condition::Value(scalar) => scalar.to_value(),
            Condition::Range(range) => range.to_value(),
            Condition::Nested(node) => node.to_value(),
            Condition::Raw(value) => value.clone(),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Condition::Value(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&RangeCondition> {
        match self {
            Condition::Range(range) => Some(range),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&FilterNode> {
        match self {
            Condition::Nested(node) => Some(node),
            _ => None,
        }
    }
}

impl From<Scalar> for Condition {
    fn from(value: Scalar) -> Self {
        Condition::Value(value)
    }
}

impl From<RangeCondition> for Condition {
    fn from(value: RangeCondition) -> Self {
        Condition::Range(value)
    }
}

impl From<FilterNode> for Condition {
    fn from(value: FilterNode) -> Self {
        Condition::Nested(value)
    }
}

/// One node of a filter tree.
///
/// `and` / `or` are only populated when the key holds an array of objects;
/// any other value under those keys stays in `fields` as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct FilterNode {
    pub and: Option<Vec<FilterNode>>,
    pub or: Option<Vec<FilterNode>>,
    pub fields: BTreeMap<String, Condition>,
}

/// Root of a filter tree; `{}` means "no filter".
pub type FilterTree = FilterNode;

impl FilterNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and_group(entries: Vec<FilterNode>) -> Self {
        Self {
            and: Some(entries),
            ..Self::default()
        }
    }

    pub fn or_group(entries: Vec<FilterNode>) -> Self {
        Self {
            or: Some(entries),
            ..Self::default()
        }
    }

    /// Node holding a single field condition
    pub fn field(name: impl Into<String>, condition: impl Into<Condition>) -> Self {
        Self::default().with_field(name, condition)
    }

    pub fn with_field(mut self, name: impl Into<String>, condition: impl Into<Condition>) -> Self {
        self.fields.insert(name.into(), condition.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.and.is_none() && self.or.is_none() && self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Condition> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn group(&self, comparator: Comparator) -> Option<&Vec<FilterNode>> {
        match comparator {
            Comparator::And => self.and.as_ref(),
            Comparator::Or => self.or.as_ref(),
        }
    }

    pub fn group_mut(&mut self, comparator: Comparator) -> &mut Option<Vec<FilterNode>> {
        match comparator {
            Comparator::And => &mut self.and,
            Comparator::Or => &mut self.or,
        }
    }

    /// Whether this node is exactly `{name: <scalar>}` with no other keys
    pub fn single_scalar(&self, name: &str) -> Option<&Scalar> {
        if self.and.is_some() || self.or.is_some() || self.fields.len() != 1 {
            return None;
        }
        self.get(name).and_then(Condition::as_scalar)
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut node = FilterNode::default();

        for (key, value) in map {
            match key.as_str() {
                AND_KEY if is_node_array(&value) => node.and = Some(node_array(value)),
                OR_KEY if is_node_array(&value) => node.or = Some(node_array(value)),
                _ => {
                    node.fields.insert(key, Condition::from_value(value));
                }
            }
        }

        node
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(entries) = &self.and {
            map.insert(
                AND_KEY.to_string(),
                Value::Array(entries.iter().map(FilterNode::to_value).collect()),
            );
        }
        if let Some(entries) = &self.or {
            map.insert(
                OR_KEY.to_string(),
                Value::Array(entries.iter().map(FilterNode::to_value).collect()),
            );
        }
        for (key, condition) in &self.fields {
            map.insert(key.clone(), condition.to_value());
        }
        Value::Object(map)
    }
}

fn is_node_array(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.iter().all(Value::is_object))
}

fn node_array(value: Value) -> Vec<FilterNode> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(FilterNode::from_map(map)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl From<Value> for FilterNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => FilterNode::from_map(map),
            _ => FilterNode::default(),
        }
    }
}

impl From<FilterNode> for Value {
    fn from(node: FilterNode) -> Self {
        node.to_value()
    }
}
