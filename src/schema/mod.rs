//! Schema Module - declarative entity contracts
//!
//! - `contract`: attribute requiredness and the build scope chain
//! - `builder`: the generic build routine every entity goes through
//! - `entity`: the `Entity`/`Node` traits and the `entity!` declaration macro
//! - `naming`: field name to element name mapping shared with the serializer

pub mod builder;
pub mod contract;
pub mod entity;
pub mod naming;

pub use contract::{AttributeSpec, Requirement, Scope};
pub use entity::{Association, Entity, Node};
