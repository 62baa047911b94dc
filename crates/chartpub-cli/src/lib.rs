//! # chartpub-cli — Command-Line Interface
//!
//! Subcommand handlers for the `chartpub` binary. Each handler loads the
//! shared [`config::Config`], builds a publisher over the configured
//! storage backend and returns a process exit code.
//!
//! ## Subcommands
//!
//! - `serve`: run the HTTP front end.
//! - `publish`: publish one chart archive from disk.
//! - `index`: print a repository's current index as YAML.

pub mod config;
pub mod index;
pub mod publish;
pub mod serve;
