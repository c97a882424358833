//! Value coercion between caller records and stored rows.
//!
//! Fetching is idempotent: running `outgoing` over its own output changes
//! nothing.

use mortar_core::{
    schema::{Attribute, Model, Type},
    Error, Record, Result, Value,
};

/// Prepares a caller record for persistence.
///
/// Every non-null value of a JSON attribute is serialized to text, strings
/// included, and `ref` attributes must hold a byte buffer. Null passes
/// through untouched.
pub(crate) fn incoming(model: &Model, record: &mut Record) -> Result<()> {
    for (name, value) in record.iter_mut() {
        let Some(attribute) = model.get_attribute(name) else {
            continue;
        };

        match attribute.ty {
            Type::Json => {
                *value = match std::mem::take(value) {
                    Value::Null | Value::Json(serde_json::Value::Null) => Value::Null,
                    Value::Json(json) => Value::String(json.to_string()),
                    other => Value::String(other.to_json().to_string()),
                };
            }
            Type::Ref => match value {
                Value::Bytes(_) | Value::Null => {}
                other => return Err(Error::unsupported_ref_value(name, other.kind_name())),
            },
            Type::String | Type::Number | Type::Boolean => {}
        }
    }

    Ok(())
}

/// Turns a fetched row into a caller record.
///
/// Columns are renamed to their attribute; columns the model does not know
/// pass through under their own name.
pub(crate) fn outgoing(model: &Model, row: Record) -> Result<Record> {
    let mut record = Record::with_capacity(row.len());

    for (column, value) in row {
        match resolve(model, &column) {
            Some(attribute) => {
                let value = coerce(attribute, value)?;
                record.insert(attribute.name.clone(), value);
            }
            None => {
                record.insert(column, value);
            }
        }
    }

    Ok(record)
}

fn resolve<'a>(model: &'a Model, key: &str) -> Option<&'a Attribute> {
    model
        .attribute_by_column(key)
        .or_else(|| model.get_attribute(key))
}

fn coerce(attribute: &Attribute, value: Value) -> Result<Value> {
    Ok(match (attribute.ty, value) {
        (Type::Boolean, Value::I64(n)) => Value::Bool(n != 0),
        (Type::Json, Value::String(text)) => parse_json(attribute, &text)?,
        (Type::Json, Value::Bytes(bytes)) => match std::str::from_utf8(&bytes) {
            Ok(text) => parse_json(attribute, text)?,
            Err(_) => {
                return Err(Error::parse(format!(
                    "attribute `{}` holds non UTF-8 JSON",
                    attribute.name
                )))
            }
        },
        (_, value) => value,
    })
}

fn parse_json(attribute: &Attribute, text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(serde_json::Value::Null) => Ok(Value::Null),
        Ok(json) => Ok(Value::Json(json)),
        Err(err) => Err(Error::parse(format!(
            "attribute `{}` holds invalid JSON: {err}",
            attribute.name
        ))),
    }
}
