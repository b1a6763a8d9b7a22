//! Value tree types and their JSON interop.

mod json;
mod value;

pub use value::{BsonObject, BsonValue};
