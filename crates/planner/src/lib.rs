//! SQL syntax tree, builder and renderer used to emit table queries.

pub mod query;
