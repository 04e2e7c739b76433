use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "typeconv",
    about = "Custom type conversions between domain values and stored rows",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Encode a person into its stored form
    Encode(EncodeArgs),
    /// Decode a stored value back into a person
    Decode(DecodeArgs),
    /// Insert, update and load an employee in an in-memory keyspace
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct EncodeArgs {
    #[arg(long)]
    pub firstname: String,
    #[arg(long)]
    pub lastname: String,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// Stored value, e.g. '{"firstname":"Homer","lastname":"Simpson"}'
    pub stored: String,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Key of the employee row
    #[arg(long, default_value = "employee-id")]
    pub id: String,
}
