use mortar_core::Value as CoreValue;
use mysql_async::{consts::ColumnType, Column, Row};

/// Charset id MySQL reports for binary columns
const BINARY_CHARSET: u16 = 63;

#[derive(Debug)]
pub struct Value(mysql_async::Value);

impl From<&CoreValue> for Value {
    fn from(value: &CoreValue) -> Self {
        use mysql_async::Value as My;

        Self(match value {
            CoreValue::Bool(value) => My::Int(i64::from(*value)),
            CoreValue::Bytes(value) => My::Bytes(value.clone()),
            CoreValue::F64(value) => My::Double(*value),
            CoreValue::I64(value) => My::Int(*value),
            CoreValue::Null => My::NULL,
            CoreValue::String(value) => My::Bytes(value.as_bytes().to_vec()),
            value @ (CoreValue::Json(_) | CoreValue::List(_) | CoreValue::Record(_)) => {
                My::Bytes(value.to_json().to_string().into_bytes())
            }
        })
    }
}

impl Value {
    pub fn into_inner(self) -> mysql_async::Value {
        self.0
    }

    /// Reads column `index` of `row`.
    pub fn from_sql(index: usize, row: &mut Row, column: &Column) -> CoreValue {
        use mysql_async::Value as My;

        let value = row.take::<My, usize>(index).unwrap_or(My::NULL);

        match value {
            My::Bytes(bytes) if is_binary(column) => CoreValue::Bytes(bytes),
            // Text protocol and string-encoded numerics arrive as bytes
            My::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Self::numeric(text, column.column_type()).into_core(),
                Err(err) => CoreValue::Bytes(err.into_bytes()),
            },
            value => Self(value).into_core(),
        }
    }

    fn numeric(text: String, ty: ColumnType) -> Self {
        use mysql_async::Value as My;

        let parsed = match ty {
            ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG => text.parse().ok().map(My::Int),
            ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
                text.parse().ok().map(My::Double)
            }
            _ => None,
        };

        match parsed {
            Some(value) => Self(value),
            None => Self(My::Bytes(text.into_bytes())),
        }
    }

    pub fn into_core(self) -> CoreValue {
        use mysql_async::Value as My;

        match self.0 {
            My::NULL => CoreValue::Null,
            My::Int(value) => CoreValue::I64(value),
            My::UInt(value) => match i64::try_from(value) {
                Ok(value) => CoreValue::I64(value),
                Err(_) => CoreValue::String(value.to_string()),
            },
            My::Float(value) => CoreValue::F64(value.into()),
            My::Double(value) => CoreValue::F64(value),
            My::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => CoreValue::String(text),
                Err(err) => CoreValue::Bytes(err.into_bytes()),
            },
            My::Date(year, month, day, hour, minute, second, micros) => {
                CoreValue::String(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}"
                ))
            }
            My::Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if negative { "-" } else { "" };
                let hours = u32::from(hours) + days * 24;
                CoreValue::String(format!(
                    "{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
                ))
            }
        }
    }
}

fn is_binary(column: &Column) -> bool {
    column.character_set() == BINARY_CHARSET
        && matches!(
            column.column_type(),
            ColumnType::MYSQL_TYPE_BLOB
                | ColumnType::MYSQL_TYPE_TINY_BLOB
                | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
                | ColumnType::MYSQL_TYPE_LONG_BLOB
                | ColumnType::MYSQL_TYPE_VAR_STRING
                | ColumnType::MYSQL_TYPE_STRING
                | ColumnType::MYSQL_TYPE_VARCHAR
        )
}
