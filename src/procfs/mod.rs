//! Kernel text interface reading.
//!
//! This module provides:
//! - `field`: the `Field` present/absent result type
//! - `schema`: declarative field tables and the extraction engine
//! - `interfaces`: the tables for each interface the engine reads
//! - `reader`: file access that degrades missing sources to absent fields

pub mod field;
pub mod interfaces;
pub mod reader;
pub mod schema;

pub use field::{Absence, Field};
pub use reader::{SourcePaths, TextInterfaceReader};
pub use schema::{Extracted, FieldKind, FieldSpec, Schema, Selector};
