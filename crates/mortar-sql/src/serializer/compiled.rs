use mortar_core::Value;

/// Engine-native SQL text plus the values to bind, in placeholder order.
///
/// Produced by the [`Serializer`](super::Serializer) and consumed once by
/// the execution engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub text: String,
    pub params: Vec<Value>,
}
