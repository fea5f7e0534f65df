//! readmes - regenerate README.md for every package in a repository
//!
//! Finds each immediate subdirectory of the repository root that holds a
//! package manifest (`Cargo.toml` by default) and runs a documentation
//! generator (`cargo readme` by default) there, writing its standard output
//! to the package's README. The first failure stops the whole run.

pub mod cli;
pub mod config;
pub mod delegate;
pub mod discover;
pub mod tool;
