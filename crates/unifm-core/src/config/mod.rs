//! Configuration for the core.
//!
//! [`settings::Config`] is stored as TOML and loaded at startup; reducers
//! read it through [`crate::context::Context`].

pub mod settings;
