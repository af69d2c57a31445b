//! deepcode command line front end
//!
//! Thin wrapper over `deepcode-app`: every subcommand builds an
//! [`deepcode_client::HttpBackend`] from the resolved configuration and
//! drives the same controller, wizard and chat session a graphical front
//! end would.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
