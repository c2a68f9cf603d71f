//! `cborg` command line tool.
//!
//! Prints annotated diagnostic dumps of CBOR data and converts between
//! binary, hex and diagnostic text.
//!
//! ```bash
//! cborg hex2diag a26161016162820203
//! cborg bin2diag data.cbor | cborg diag2bin -o copy.cbor
//! cborg check --strict data.cbor
//! ```

use std::io::{self, Write};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cborg::{bytes, DecodeOptions, Tag, Value, DEFAULT_WIDTH};

mod files;

use files::{Input, Output};

/// Tags given a pass-through decoder by `check`, in addition to `--tag`.
const KNOWN_TAGS: &[u64] = &[
    0, 1, 2, 3, 4, 5, 16, 17, 18, 21, 22, 23, 24, 32, 33, 34, 35, 36, 37, 55799,
];

#[derive(Parser, Debug)]
#[command(version, about = "Inspect and convert CBOR data", long_about = None)]
struct Cli {
    /// Raise log verbosity (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the diagnostic dump of hex encoded CBOR
    Hex2diag {
        /// Hex input
        hex: String,
        /// Output width
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
    },
    /// Print the diagnostic dump of binary CBOR
    Bin2diag {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: Input,
        /// Output width
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
    },
    /// Convert a diagnostic dump to hex
    Diag2hex {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: Input,
    },
    /// Convert a diagnostic dump to binary
    Diag2bin {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: Input,
        /// Output file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Output,
    },
    /// Convert hex to binary
    Hex2bin {
        /// Hex input
        hex: String,
        /// Output file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: Output,
    },
    /// Convert binary to hex
    Bin2hex {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: Input,
    },
    /// Decode binary CBOR and print the resulting value
    Check {
        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: Input,
        /// Reject integers and lengths which are not minimally encoded
        #[arg(long)]
        strict: bool,
        /// Additional tag numbers to accept
        #[arg(long = "tag", value_name = "NUM")]
        tags: Vec<u64>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_hex(hex: &str) -> anyhow::Result<Vec<u8>> {
    bytes::from_hex(hex.trim()).context("input is not a hexadecimal string")
}

fn print_diagnostic(data: &[u8], width: usize) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in cborg::tokens_to_diagnostic(data, width) {
        writeln!(stdout, "{}", line?)?;
    }
    Ok(())
}

fn check_options(strict: bool, extra: &[u64]) -> DecodeOptions {
    let options = DecodeOptions {
        strict,
        ..DecodeOptions::default()
    };
    KNOWN_TAGS
        .iter()
        .chain(extra)
        .fold(options, |options, &num| {
            options.with_tag(num, move |content| {
                Ok(Value::from(Tag::new(num, content.decode()?)))
            })
        })
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Hex2diag { hex, width } => print_diagnostic(&parse_hex(&hex)?, width),
        Commands::Bin2diag { input, width } => {
            let data = input.read_all().context("failed to read input")?;
            debug!(len = data.len(), "read input");
            print_diagnostic(&data, width)
        }
        Commands::Diag2hex { input } => {
            let text = input.read_to_string().context("failed to read input")?;
            println!("{}", bytes::to_hex(&cborg::from_diag(&text)?));
            Ok(())
        }
        Commands::Diag2bin { input, output } => {
            let text = input.read_to_string().context("failed to read input")?;
            let data = cborg::from_diag(&text)?;
            output.write_all(&data).context("failed to write output")
        }
        Commands::Hex2bin { hex, output } => {
            let data = parse_hex(&hex)?;
            output.write_all(&data).context("failed to write output")
        }
        Commands::Bin2hex { input } => {
            let data = input.read_all().context("failed to read input")?;
            println!("{}", bytes::to_hex(&data));
            Ok(())
        }
        Commands::Check {
            input,
            strict,
            tags,
        } => {
            let data = input.read_all().context("failed to read input")?;
            let value = cborg::decode(&data, &check_options(strict, &tags))?;
            info!(len = data.len(), kind = %value.kind(), "decoded");
            println!("{value:?}");
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli.command)
}
