use mortar_core::driver::NativeError;

/// Maps a client error to the transport-neutral form.
///
/// Server errors are statement errors carrying the server's symbolic code
/// when one is known, the numeric code otherwise. Everything else means the
/// connection is no longer usable.
pub(crate) fn native(err: mysql_async::Error) -> NativeError {
    match err {
        mysql_async::Error::Server(err) => {
            NativeError::statement(Some(symbolic(err.code)), err.message)
        }
        err => NativeError::transport(err.to_string()),
    }
}

fn symbolic(code: u16) -> String {
    let name = match code {
        1048 => "ER_BAD_NULL_ERROR",
        1054 => "ER_BAD_FIELD_ERROR",
        1062 => "ER_DUP_ENTRY",
        1064 => "ER_PARSE_ERROR",
        1146 => "ER_NO_SUCH_TABLE",
        1451 => "ER_ROW_IS_REFERENCED_2",
        1452 => "ER_NO_REFERENCED_ROW_2",
        code => return code.to_string(),
    };

    name.to_string()
}
