//! JSON ↔ DynamoDB attribute conversion for bulk records and keys.
//!
//! Bulk operations move records as JSON objects; the wire protocol speaks
//! `AttributeValue` maps. Numbers travel as DynamoDB's decimal strings and
//! come back as `i64` when they parse exactly, `f64` otherwise. Binary and
//! set attributes have no JSON form at this layer and are dropped on the way
//! out.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};

use crate::error::{AccessError, Result};

/// Converts a JSON object into a DynamoDB item (or key) map.
///
/// Fails unless `value` is an object: records and keys are attribute tuples,
/// never bare scalars.
pub fn item_from_json(value: &Value) -> Result<HashMap<String, AttributeValue>> {
    let Value::Object(map) = value else {
        return Err(AccessError::shape("batch record must be a JSON object"));
    };
    Ok(map
        .iter()
        .map(|(name, field)| (name.clone(), attr_from_json(field)))
        .collect())
}

/// Converts a DynamoDB item map back into a JSON object.
#[must_use]
pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> Value {
    Value::Object(
        item.iter()
            .filter_map(|(name, attr)| attr_to_json(attr).map(|field| (name.clone(), field)))
            .collect(),
    )
}

fn attr_from_json(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(list) => AttributeValue::L(list.iter().map(attr_from_json).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(name, field)| (name.clone(), attr_from_json(field)))
                .collect(),
        ),
    }
}

fn attr_to_json(attr: &AttributeValue) -> Option<Value> {
    match attr {
        AttributeValue::S(text) => Some(Value::String(text.clone())),
        AttributeValue::N(number) => {
            if let Ok(int) = number.parse::<i64>() {
                Some(Value::Number(int.into()))
            } else if let Ok(float) = number.parse::<f64>() {
                Number::from_f64(float).map(Value::Number)
            } else {
                None
            }
        }
        AttributeValue::Bool(flag) => Some(Value::Bool(*flag)),
        AttributeValue::Null(_) => Some(Value::Null),
        AttributeValue::L(list) => Some(Value::Array(
            list.iter().filter_map(attr_to_json).collect(),
        )),
        AttributeValue::M(map) => Some(Value::Object(
            map.iter()
                .filter_map(|(name, field)| attr_to_json(field).map(|json| (name.clone(), json)))
                .collect(),
        )),
        // Binary and set attributes: no JSON form here.
        _ => None,
    }
}
