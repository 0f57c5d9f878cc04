use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "attr-splitter")]
#[command(about = "Render and combine attributes split across several form inputs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./attr_splitter.json, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the configuration and list declared fields
    Check,

    /// Render the inputs of a split attribute
    #[command(alias = "r")]
    Render {
        /// Model name (e.g. user)
        model: String,

        /// Logical attribute (e.g. phone_number)
        attribute: String,

        /// Move focus to the next input once one is full
        #[arg(long)]
        jump: bool,

        /// Mask full inputs when they lose focus
        #[arg(long)]
        obscure: bool,

        /// Current field values, as field=value
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },

    /// Combine segment values into their logical attributes and print the record
    #[command(alias = "c")]
    Combine {
        /// Model name (e.g. user)
        model: String,

        /// Field values, as field=value
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got '{}'", raw)),
    }
}
