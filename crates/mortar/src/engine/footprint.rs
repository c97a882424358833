use mortar_core::{driver::NativeError, Footprint};

/// Classifies a rejected statement from the engine's native error.
///
/// Codes are matched as MySQL symbolic names, MySQL numeric codes, SQLSTATE
/// values and SQLite extended result names.
pub(super) fn parse(err: &NativeError) -> Footprint {
    let code = err.code.as_deref().unwrap_or_default();

    match code {
        "ER_DUP_ENTRY" | "1062" | "23505" | "SQLITE_CONSTRAINT_UNIQUE"
        | "SQLITE_CONSTRAINT_PRIMARYKEY" => Footprint::NotUnique {
            keys: unique_keys(&err.message),
        },
        "ER_NO_SUCH_TABLE" | "1146" | "42P01" => Footprint::NoSuchTable,
        "ER_BAD_FIELD_ERROR" | "1054" | "42703" => Footprint::NoSuchColumn,
        "ER_BAD_NULL_ERROR" | "1048" | "23502" | "SQLITE_CONSTRAINT_NOTNULL" => Footprint::NotNull,
        "ER_NO_REFERENCED_ROW_2" | "1452" | "ER_ROW_IS_REFERENCED_2" | "1451" | "23503"
        | "SQLITE_CONSTRAINT_FOREIGNKEY" => Footprint::ForeignKey,
        _ => from_message(&err.message),
    }
}

/// Fallback for transports that do not report a code.
fn from_message(message: &str) -> Footprint {
    if message.starts_with("UNIQUE constraint failed") {
        Footprint::NotUnique {
            keys: unique_keys(message),
        }
    } else if message.starts_with("no such table") {
        Footprint::NoSuchTable
    } else if message.starts_with("no such column") {
        Footprint::NoSuchColumn
    } else if message.starts_with("NOT NULL constraint failed") {
        Footprint::NotNull
    } else if message.starts_with("FOREIGN KEY constraint failed") {
        Footprint::ForeignKey
    } else {
        Footprint::Catchall
    }
}

/// Extracts the offending keys from a uniqueness violation message.
fn unique_keys(message: &str) -> Vec<String> {
    // MySQL: Duplicate entry 'a@b.c' for key 'users.email'
    if let Some(rest) = message.rsplit_once(" for key ").map(|(_, rest)| rest) {
        let key = rest.trim().trim_matches(|c| c == '\'' || c == '`');
        let key = key.rsplit_once('.').map(|(_, key)| key).unwrap_or(key);
        return vec![key.to_string()];
    }

    // PostgreSQL detail: Key (email, org)=(a@b.c, 1) already exists.
    if let Some(start) = message.find("Key (") {
        let rest = &message[start + "Key (".len()..];
        if let Some(end) = rest.find(")=") {
            return rest[..end]
                .split(',')
                .map(|key| key.trim().trim_matches('"').to_string())
                .collect();
        }
    }

    // SQLite: UNIQUE constraint failed: users.email, users.org
    if let Some((_, columns)) = message.split_once("constraint failed:") {
        return columns
            .split(',')
            .map(|column| {
                let column = column.trim();
                column
                    .rsplit_once('.')
                    .map(|(_, column)| column)
                    .unwrap_or(column)
                    .to_string()
            })
            .collect();
    }

    vec![]
}
