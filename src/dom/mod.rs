//! DOM Module - owned element trees
//!
//! Captured fragments are small, so a plain owned tree is enough here:
//! - `Element`: name, attributes, element children and character data

pub mod element;

pub use element::Element;
