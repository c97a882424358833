use super::{Comparison, Criteria, Direction, Op, Predicate, Sort};
use crate::{Error, Result, Value};

use serde_json::{Map, Value as Json};

impl Criteria {
    /// Parses Waterline-style criteria.
    ///
    /// ```
    /// use mortar_core::Criteria;
    /// use serde_json::json;
    ///
    /// let criteria = Criteria::from_json(json!({
    ///     "where": { "and": [{ "name": "foo" }, { "age": { ">": 27, "<": 30 } }] },
    ///     "sort": [{ "age": "DESC" }],
    ///     "limit": 10
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(criteria.limit, Some(10));
    /// ```
    pub fn from_json(json: Json) -> Result<Criteria> {
        let Json::Object(map) = json else {
            return Err(Error::malformed_criteria("criteria must be an object"));
        };

        let mut criteria = Criteria::default();

        for (key, value) in map {
            match key.as_str() {
                "where" => criteria.filter = parse_where(value)?,
                "sort" => criteria.sort = parse_sort(value)?,
                "limit" => criteria.limit = parse_count("limit", value)?,
                "skip" => criteria.skip = parse_count("skip", value)?,
                "select" => criteria.select = parse_select(value)?,
                // Waterline passes `omit` alongside `select`; projection is
                // driven by `select` alone.
                "omit" => {}
                other => {
                    return Err(Error::malformed_criteria(format!(
                        "unknown criteria clause `{other}`"
                    )))
                }
            }
        }

        Ok(criteria)
    }
}

fn parse_where(json: Json) -> Result<Option<Predicate>> {
    match json {
        Json::Null => Ok(None),
        Json::Object(map) if map.is_empty() => Ok(None),
        Json::Object(map) => parse_object(map).map(Some),
        other => Err(Error::malformed_criteria(format!(
            "`where` must be an object; found `{other}`"
        ))),
    }
}

/// Each key of a where-object is a separate constraint; several keys are
/// implicitly AND-ed in key order.
fn parse_object(map: Map<String, Json>) -> Result<Predicate> {
    let mut operands = Vec::with_capacity(map.len());

    for (key, value) in map {
        operands.push(match key.as_str() {
            "and" => Predicate::And(parse_branches("and", value)?),
            "or" => Predicate::Or(parse_branches("or", value)?),
            "not" => {
                return Err(Error::malformed_criteria(
                    "`not` predicates are not supported",
                ))
            }
            _ => parse_constraint(key, value)?,
        });
    }

    Ok(single_or_and(operands))
}

fn parse_branches(kind: &str, json: Json) -> Result<Vec<Predicate>> {
    let Json::Array(branches) = json else {
        return Err(Error::malformed_criteria(format!(
            "`{kind}` expects an array of predicates"
        )));
    };

    branches
        .into_iter()
        .map(|branch| match branch {
            Json::Object(map) => parse_object(map),
            other => Err(Error::malformed_criteria(format!(
                "`{kind}` branch must be an object; found `{other}`"
            ))),
        })
        .collect()
}

fn parse_constraint(attribute: String, json: Json) -> Result<Predicate> {
    match json {
        Json::Null => Ok(comparison(attribute, Op::IsNull, Value::Null)),
        Json::Array(items) => Ok(comparison(attribute, Op::In, parse_list(items)?)),
        Json::Object(map) => {
            let mut operands = Vec::with_capacity(map.len());

            for (modifier, operand) in map {
                operands.push(parse_modifier(&attribute, &modifier, operand)?);
            }

            if operands.is_empty() {
                return Err(Error::malformed_criteria(format!(
                    "empty modifier object for `{attribute}`"
                )));
            }

            Ok(single_or_and(operands))
        }
        scalar => Ok(comparison(attribute, Op::Eq, Value::from_json(scalar))),
    }
}

fn parse_modifier(attribute: &str, modifier: &str, operand: Json) -> Result<Predicate> {
    let op = match modifier {
        "<" => Op::Lt,
        "<=" => Op::Le,
        ">" => Op::Gt,
        ">=" => Op::Ge,
        "!=" => Op::Ne,
        "like" | "contains" => Op::Like,
        "startsWith" => Op::StartsWith,
        "endsWith" => Op::EndsWith,
        "in" => Op::In,
        "nin" => Op::NotIn,
        "not" => {
            return Err(Error::malformed_criteria(
                "`not` predicates are not supported",
            ))
        }
        other => {
            return Err(Error::malformed_criteria(format!(
                "unknown operator `{other}` for `{attribute}`"
            )))
        }
    };

    let value = match (op, operand) {
        (Op::In | Op::NotIn, Json::Array(items)) => parse_list(items)?,
        (Op::In | Op::NotIn, other) => {
            return Err(Error::malformed_criteria(format!(
                "`{modifier}` for `{attribute}` expects an array; found `{other}`"
            )))
        }
        (Op::Ne, Json::Null) => return Ok(comparison(attribute, Op::IsNotNull, Value::Null)),
        (Op::Like | Op::StartsWith | Op::EndsWith, Json::String(s)) => Value::String(s),
        (Op::Like | Op::StartsWith | Op::EndsWith, other) => {
            return Err(Error::malformed_criteria(format!(
                "`{modifier}` for `{attribute}` expects a string; found `{other}`"
            )))
        }
        (_, Json::Array(_) | Json::Object(_)) => {
            return Err(Error::malformed_criteria(format!(
                "`{modifier}` for `{attribute}` expects a scalar"
            )))
        }
        (_, scalar) => Value::from_json(scalar),
    };

    Ok(comparison(attribute, op, value))
}

fn parse_list(items: Vec<Json>) -> Result<Value> {
    items
        .into_iter()
        .map(|item| match item {
            Json::Array(_) | Json::Object(_) => Err(Error::malformed_criteria(
                "`in` lists may only contain scalars",
            )),
            scalar => Ok(Value::from_json(scalar)),
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

fn parse_sort(json: Json) -> Result<Vec<Sort>> {
    match json {
        Json::Null => Ok(vec![]),
        Json::String(clause) => parse_sort_clause(&clause).map(|sort| vec![sort]),
        Json::Object(map) => parse_sort_object(map),
        Json::Array(items) => {
            let mut sort = vec![];
            for item in items {
                match item {
                    Json::String(clause) => sort.push(parse_sort_clause(&clause)?),
                    Json::Object(map) => sort.extend(parse_sort_object(map)?),
                    other => {
                        return Err(Error::malformed_criteria(format!(
                            "invalid sort clause `{other}`"
                        )))
                    }
                }
            }
            Ok(sort)
        }
        other => Err(Error::malformed_criteria(format!(
            "invalid sort clause `{other}`"
        ))),
    }
}

fn parse_sort_object(map: Map<String, Json>) -> Result<Vec<Sort>> {
    map.into_iter()
        .map(|(attribute, direction)| {
            Ok(Sort {
                attribute,
                direction: Direction::from_json(&direction)?,
            })
        })
        .collect()
}

/// Parses `"name"` or `"name DESC"`.
fn parse_sort_clause(clause: &str) -> Result<Sort> {
    let mut parts = clause.split_whitespace();

    let Some(attribute) = parts.next() else {
        return Err(Error::malformed_criteria("empty sort clause"));
    };

    let direction = match parts.next() {
        None => Direction::Asc,
        Some(direction) => Direction::from_json(&Json::String(direction.to_string()))?,
    };

    if parts.next().is_some() {
        return Err(Error::malformed_criteria(format!(
            "invalid sort clause `{clause}`"
        )));
    }

    Ok(Sort {
        attribute: attribute.to_string(),
        direction,
    })
}

fn parse_count(clause: &str, json: Json) -> Result<Option<u64>> {
    match json {
        Json::Null => Ok(None),
        Json::Number(n) => n.as_u64().map(Some).ok_or_else(|| {
            Error::malformed_criteria(format!(
                "`{clause}` must be a non-negative integer; found `{n}`"
            ))
        }),
        other => Err(Error::malformed_criteria(format!(
            "`{clause}` must be a non-negative integer; found `{other}`"
        ))),
    }
}

fn parse_select(json: Json) -> Result<Vec<String>> {
    let Json::Array(items) = json else {
        return Err(Error::malformed_criteria("`select` must be an array"));
    };

    let mut select = vec![];
    for item in items {
        match item {
            Json::String(s) if s == "*" => return Ok(vec![]),
            Json::String(s) => select.push(s),
            other => {
                return Err(Error::malformed_criteria(format!(
                    "`select` entries must be strings; found `{other}`"
                )))
            }
        }
    }
    Ok(select)
}

fn comparison(attribute: impl Into<String>, op: Op, value: Value) -> Predicate {
    Predicate::Comparison(Comparison {
        attribute: attribute.into(),
        op,
        value,
    })
}

fn single_or_and(mut operands: Vec<Predicate>) -> Predicate {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        Predicate::And(operands)
    }
}
