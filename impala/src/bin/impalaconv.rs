use std::io;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::{Result, eyre::{eyre, OptionExt, WrapErr}};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use impala::{
    Action, BinarySerializable, ByteStream, JsonValue, PermissionLevel, Reflect, to_hex,
};


#[derive(Parser)]
#[command(
    name="impalaconv",
    version=impala::config::VERSION,
    about="Utility to convert action envelopes between JSON and their packed hex representation",
    arg_required_else_help(true),
)]
struct Cli {
    /// Turn verbose level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print any logging messages
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a JSON object to its packed hex representation
    Pack {
        /// the type of the object to convert
        typename: Envelope,

        /// a JSON representation of the object to convert
        json: String,
    },

    /// Decode packed hex data as a JSON object
    Unpack {
        /// the type of the object to convert
        typename: Envelope,

        /// an hex representation of the object we want to decode
        hex: String,
    },

    /// Show the fields of a type, in the order they are packed
    Describe {
        typename: Envelope,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Envelope {
    #[value(name = "action")]
    Action,
    #[value(name = "permission_level")]
    PermissionLevel,
}


fn init_tracing(verbose_level: u8) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let tracing = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter);

    match verbose_level {
        0 => tracing.init(),
        1 => tracing.with_max_level(Level::DEBUG).init(),
        _ => tracing.with_max_level(Level::TRACE).init(),
    }
}

fn pack<T: DeserializeOwned + BinarySerializable>(json: &str) -> Result<String> {
    let v: JsonValue = json.parse().wrap_err("invalid JSON")?;
    let value: T = serde_json::from_value(v)?;
    Ok(to_hex(&value))
}

fn unpack<T: Serialize + BinarySerializable>(hex: &str) -> Result<JsonValue> {
    let mut bin = ByteStream::from_hex(hex).wrap_err("invalid hex representation")?;
    let value = T::from_bin(&mut bin)?;
    let v = serde_json::to_value(&value)?;

    if !bin.leftover().is_empty() {
        return Err(eyre!("Trailing input, {} bytes haven't been consumed. Decoded object: {}",
                         bin.leftover().len(), &v));
    }
    Ok(v)
}

fn describe(typename: Envelope) -> JsonValue {
    match typename {
        Envelope::Action => Action::describe(),
        Envelope::PermissionLevel => PermissionLevel::describe(),
    }
}

/// Execute `cmd` and return what should be printed on stdout
fn run(cmd: Commands) -> Result<String> {
    Ok(match cmd {
        Commands::Pack { typename, json } => match typename {
            Envelope::Action => pack::<Action>(&json)?,
            Envelope::PermissionLevel => pack::<PermissionLevel>(&json)?,
        },

        Commands::Unpack { typename, hex } => {
            let v = match typename {
                Envelope::Action => unpack::<Action>(&hex)?,
                Envelope::PermissionLevel => unpack::<PermissionLevel>(&hex)?,
            };
            v.to_string()
        },

        Commands::Describe { typename } => serde_json::to_string_pretty(&describe(typename))?,
    })
}

pub fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if !cli.quiet {
        init_tracing(cli.verbose);
    }

    debug!(version = impala::config::VERSION,
           detailed_errors = impala::config::DETAILED_ERRORS,
           "impalaconv started");

    let cmd = cli.command.ok_or_eyre("No command given. You need to specify at least one")?;
    debug!(?cmd, "running command");

    println!("{}", run(cmd)?);

    Ok(())
}
