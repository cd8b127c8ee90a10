//! Critic - cached AI code review for GitHub repositories
//!
//! Reviews each eligible file of a repository with an assessment engine,
//! aggregates the file reviews into a graded repository review, and caches
//! both levels by content fingerprint so unchanged content is never
//! assessed twice.

pub mod assess;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod review;
pub mod server;
pub mod source;
pub mod ui;

pub use error::{CriticError, CriticResult};
