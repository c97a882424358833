use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub attribute: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Parses a direction from JSON.
    ///
    /// Mongo-style numbers are accepted: `1` is ascending, any other truthy
    /// value is descending. `"ASC"`/`"DESC"` are matched case-insensitively.
    pub fn from_json(json: &serde_json::Value) -> Result<Direction> {
        use serde_json::Value as Json;

        match json {
            Json::String(s) if s.eq_ignore_ascii_case("asc") => Ok(Direction::Asc),
            Json::String(s) if s.eq_ignore_ascii_case("desc") => Ok(Direction::Desc),
            Json::Number(n) if n.as_i64() == Some(1) => Ok(Direction::Asc),
            Json::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Ok(Direction::Desc),
            Json::Bool(true) => Ok(Direction::Desc),
            Json::String(s) if !s.is_empty() => Ok(Direction::Desc),
            other => Err(Error::malformed_criteria(format!(
                "invalid sort direction `{other}`"
            ))),
        }
    }
}
