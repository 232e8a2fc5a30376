use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use tempfile::NamedTempFile;

use huffpack::container::FILE_EXTENSION;
use huffpack::{CompressionStats, ContainerHeader, HuffmanCodec};

#[derive(Parser, Debug)]
#[command(author, version, about = "Static Huffman file compressor", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print the size and timing summary
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a .huff container
    Compress {
        /// File to compress, or - for stdin
        input: PathBuf,
        /// Output path (default: <INPUT>.huff)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },
    /// Restore the original file from a .huff container
    Decompress {
        /// Container to read, or - for stdin
        input: PathBuf,
        /// Output path (default: <INPUT> without .huff)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },
    /// Show what a container holds without decompressing it
    Inspect {
        input: PathBuf,
        /// Print the rebuilt Huffman tree
        #[arg(long)]
        tree: bool,
        /// Print the code assigned to each symbol
        #[arg(long)]
        codes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compress { input, output, force } => {
            let output = output.unwrap_or_else(|| compressed_path(&input));
            let started = Instant::now();
            let stats = write_atomically(&output, force, |out| {
                if is_stdin(&input) {
                    return Ok(HuffmanCodec::compress_unseekable(io::stdin().lock(), out)?);
                }
                let file = File::open(&input)
                    .with_context(|| format!("cannot open {}", input.display()))?;
                // pipes, FIFOs and character devices cannot be rewound for the second pass
                if file.metadata()?.is_file() {
                    Ok(HuffmanCodec::compress(BufReader::new(file), out)?)
                } else {
                    Ok(HuffmanCodec::compress_unseekable(file, out)?)
                }
            })
            .with_context(|| format!("failed to compress {}", input.display()))?;
            report(cli.quiet, &input, &output, &stats, started);
        }
        Command::Decompress { input, output, force } => {
            let output = match output {
                Some(path) => path,
                None if is_stdin(&input) => bail!("an output path is required when reading stdin"),
                None => decompressed_path(&input),
            };
            let started = Instant::now();
            let stats = write_atomically(&output, force, |out| {
                if is_stdin(&input) {
                    Ok(HuffmanCodec::decompress(io::stdin().lock(), out)?)
                } else {
                    let file = File::open(&input)
                        .with_context(|| format!("cannot open {}", input.display()))?;
                    Ok(HuffmanCodec::decompress(BufReader::new(file), out)?)
                }
            })
            .with_context(|| format!("failed to decompress {}", input.display()))?;
            report(cli.quiet, &input, &output, &stats, started);
        }
        Command::Inspect { input, tree, codes } => inspect(&input, tree, codes)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn compressed_path(input: &Path) -> PathBuf {
    if is_stdin(input) {
        return PathBuf::from(format!("stdin.{}", FILE_EXTENSION));
    }
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(FILE_EXTENSION);
    PathBuf::from(name)
}

fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().map_or(false, |ext| ext == FILE_EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

/// Runs `body` against a temp file next to `output` and renames it into
/// place only if `body` succeeds. A failed run leaves no output file behind.
fn write_atomically<F>(output: &Path, force: bool, body: F) -> anyhow::Result<CompressionStats>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> anyhow::Result<CompressionStats>,
{
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create a temporary file in {}", dir.display()))?;

    let stats = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let stats = body(&mut writer)?;
        writer.flush().context("write failed")?;
        stats
    };
    tmp.as_file().sync_all().context("write failed")?;

    let persisted = if force {
        tmp.persist(output)
    } else {
        tmp.persist_noclobber(output)
    };
    persisted.with_context(|| format!("cannot write {}", output.display()))?;

    info!("wrote {}", output.display());
    Ok(stats)
}

fn report(quiet: bool, input: &Path, output: &Path, stats: &CompressionStats, started: Instant) {
    if quiet {
        return;
    }
    println!(
        "{} ({} bytes) -> {} ({} bytes), ratio {:.1}%, {} symbols, {:.3}s",
        input.display(),
        stats.input_bytes,
        output.display(),
        stats.output_bytes,
        stats.ratio() * 100.0,
        stats.distinct_symbols,
        started.elapsed().as_secs_f64()
    );
}

fn inspect(path: &Path, show_tree: bool, show_codes: bool) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let file_len = file.metadata()?.len();
    let header = ContainerHeader::read(&mut BufReader::new(file))
        .with_context(|| format!("{} is not a valid container", path.display()))?;

    let header_len = header.encoded_len();
    println!("file:              {}", path.display());
    println!("original length:   {} bytes", header.original_length);
    println!("distinct symbols:  {}", header.frequencies.symbol_count());
    println!("header size:       {} bytes", header_len);
    println!("payload size:      {} bytes", file_len.saturating_sub(header_len));
    if header.original_length > 0 {
        println!(
            "ratio:             {:.1}%",
            file_len as f64 / header.original_length as f64 * 100.0
        );
    }

    if !(show_tree || show_codes) {
        return Ok(());
    }

    let codec = HuffmanCodec::from_frequencies(&header.frequencies)?;
    if show_tree {
        print!("{}", codec.tree().render());
    }
    if show_codes {
        println!("Code Table:");
        for (symbol, code) in codec.code_table().iter() {
            let shown = if symbol.is_ascii_graphic() { symbol as char } else { '.' };
            println!(
                "  {:#04x} '{}' freq {:>10}  {}",
                symbol,
                shown,
                header.frequencies.get(symbol),
                code
            );
        }
    }
    Ok(())
}
