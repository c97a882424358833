/// Builds a [`Record`](crate::Record) from `attribute => value` pairs.
///
/// ```
/// let user = mortar_core::record! { "name" => "Ada", "age" => 36 };
/// assert_eq!(user.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ( $( $name:expr => $value:expr ),+ $(,)? ) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert(::std::string::String::from($name), $crate::Value::from($value));
        )+
        record
    }};
}
