//! Tarantool SQL driver for ORM-style database layers.
//!
//! Translates the portable schema and query vocabulary of an ORM into
//! the Tarantool SQL dialect and runs the statements through a SQL
//! client.

pub mod backend;
pub mod config;
pub mod connection;
pub mod dsn;
pub mod errors;
pub mod executor;
pub mod ir;
pub mod log;
