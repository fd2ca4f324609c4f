//! Adaptive difficulty engine, scoring, and session driver for adaptiq.
//!
//! This crate defines the engine state and its transition function, the
//! summaries derived from it, and the collaborator traits and local
//! implementations the CLI uses to run and store sessions.

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod respondent;
pub mod session;
pub mod statistics;
pub mod store;
pub mod traits;
