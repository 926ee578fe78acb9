use thiserror::Error;

use crate::data::USABLE_PAYLOAD_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialError {
    #[error("material attribute names cannot be empty")]
    EmptyAttributeName,
    #[error("material attribute name {0:?} contains a zero byte")]
    AttributeNameContainsNul(String),
    #[error(
        "material attribute {name:?} is too large: {name_size} name bytes and {value_size} value bytes exceed {available} bytes",
        available = USABLE_PAYLOAD_SIZE
    )]
    OversizedAttribute {
        name: String,
        name_size: usize,
        value_size: usize,
    },
    #[error("invalid material attribute type {0:#04x}")]
    InvalidAttributeType(u8),
    #[error("malformed material attribute: {0}")]
    MalformedAttribute(&'static str),
}
