//! Driven adapters: implementations of domain ports against real backends.

pub mod persistence;
