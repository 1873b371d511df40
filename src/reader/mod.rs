//! Event readers
//!
//! - `slice`: pull events from a complete fragment or a stream prefix
//! - `buffered`: pull decoded UTF-8 chunks from any `Read`
//! - `structure`: open-element bookkeeping shared by both parse paths

pub mod buffered;
pub mod events;
pub mod slice;
pub mod structure;

pub use buffered::BufferedReader;
pub use events::{EndElement, StartElement, XmlEvent};
pub use slice::SliceReader;
pub use structure::StructureCheck;
