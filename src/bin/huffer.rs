//! huffer CLI - block Huffman compression tool
//!
//! Compresses a file into a `.huff` stream of block records, or restores
//! the original from one.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use huffer::options::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};
use huffer::{compress_stream, decompress_stream, CodecOptions, StreamStats};

/// Extension appended to compressed files.
const EXTENSION: &str = "huff";

/// Block-oriented Huffman compression tool.
#[derive(Parser, Debug)]
#[command(name = "huffer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show sizes, ratio, block counts and timing
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log filter for diagnostics on stderr (e.g. "debug", "huffer=trace")
    #[arg(long, global = true, default_value = "warn", value_name = "FILTER")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT into INPUT.huff
    Compress {
        #[command(flatten)]
        io: IoArgs,

        /// Bytes per block
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_BLOCK_SIZE,
            value_parser = clap::value_parser!(u64).range(1..=MAX_BLOCK_SIZE as u64)
                .map(|v| v as usize)
        )]
        block_size: usize,
    },
    /// Restore INPUT.huff into INPUT
    Decompress {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (derived from INPUT when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level)?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let start = Instant::now();
    let (verb, io, output, stats) = match &cli.command {
        Command::Compress { io, block_size } => {
            let options = CodecOptions {
                block_size: *block_size,
                ..CodecOptions::default()
            };
            let output = io.output.clone().unwrap_or_else(|| compressed_name(&io.input));
            let stats = with_files(&io.input, &output, |r, w| compress_stream(r, w, &options))?;
            ("Compressed", io, output, stats)
        }
        Command::Decompress { io } => {
            let output = match &io.output {
                Some(path) => path.clone(),
                None => decompressed_name(&io.input).ok_or_else(|| {
                    format!(
                        "{} has no .{EXTENSION} extension; pass -o to name the output",
                        io.input.display()
                    )
                })?,
            };
            let stats = with_files(&io.input, &output, |r, w| decompress_stream(r, w))?;
            ("Decompressed", io, output, stats)
        }
    };
    let elapsed = start.elapsed();

    if cli.verbose {
        eprintln!("{verb}: {:?} -> {:?}", io.input, output);
        eprintln!(
            "  Blocks: {} ({} compressed, {} raw)",
            stats.blocks, stats.compressed_blocks, stats.raw_blocks
        );
        eprintln!("  Time: {:.2?}", elapsed);
        eprintln!(
            "  Size: {} -> {} ({:.1}%)",
            format_size(stats.bytes_in),
            format_size(stats.bytes_out),
            stats.ratio() * 100.0
        );
    } else {
        println!(
            "{} -> {} ({:.1}%)",
            format_size(stats.bytes_in),
            format_size(stats.bytes_out),
            stats.ratio() * 100.0
        );
    }

    Ok(())
}

/// Open `input` and create `output`, then run `op` over buffered handles.
fn with_files<F>(
    input: &Path,
    output: &Path,
    op: F,
) -> Result<StreamStats, Box<dyn std::error::Error>>
where
    F: FnOnce(&mut BufReader<File>, &mut BufWriter<File>) -> huffer::Result<StreamStats>,
{
    if input == output {
        return Err(format!("input and output are the same file: {}", input.display()).into());
    }
    let mut reader = BufReader::new(
        File::open(input).map_err(|e| format!("cannot open {}: {e}", input.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(output).map_err(|e| format!("cannot create {}: {e}", output.display()))?,
    );
    Ok(op(&mut reader, &mut writer)?)
}

/// `data.bin` becomes `data.bin.huff`.
fn compressed_name(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// `data.bin.huff` becomes `data.bin`; `None` without the extension.
fn decompressed_name(input: &Path) -> Option<PathBuf> {
    let stem = input.file_stem()?;
    if input.extension()? != EXTENSION || stem.is_empty() {
        return None;
    }
    Some(input.with_file_name(stem))
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
