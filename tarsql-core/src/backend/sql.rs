//! SQL generation for the Tarantool dialect.

pub mod ir;
pub mod query;
pub mod schema;
pub mod words;
