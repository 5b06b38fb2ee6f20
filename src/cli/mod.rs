//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ResolveCommand, RunCommand, ValidateCommand};
use std::ffi::OsString;

/// Containerized CI build descriptor runner
#[derive(Debug, Parser, Clone)]
#[command(name = "buildpipe")]
#[command(author = "buildpipe Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Resolve and run declarative containerized build descriptors", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Resolve and run a descriptor
    Run(RunCommand),

    /// Resolve a descriptor and print the concrete steps
    Resolve(ResolveCommand),

    /// Validate a descriptor file
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
