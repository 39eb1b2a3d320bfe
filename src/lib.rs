//! dbforge library
//!
//! Turns a plain-language app description into an ER diagram and the
//! data-layer boilerplate for a chosen backend.
//! The main binary is in src/main.rs.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod setup;
