//! Driving adapters: entry points that translate external requests into
//! domain operations.

pub mod http;
