//! Portable schema and value vocabulary.
//!
//! Everything the grammars consume: scalar values, column specifications
//! and schema blueprints.

pub mod blueprint;
pub mod column;
pub mod value;
