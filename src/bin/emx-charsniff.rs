//! emx-charsniff CLI
//!
//! Dump a directory as a tree plus inline text contents, or report the
//! guessed encoding of individual files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emx_charsniff::{BinaryMode, Classifier, DumpConfig, Dumper, Script};
use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "emx-charsniff")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Text/binary classification and encoding guessing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a directory tree followed by the contents of its text files
    Dump {
        /// Directory to dump
        directory: PathBuf,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Embed binary files as base64 instead of skipping them
        #[arg(long)]
        base64: bool,

        /// Append the guessed encoding to each file header
        #[arg(long)]
        show_encoding: bool,

        /// Script hint for encoding guesses (e.g. cyrillic, greek)
        #[arg(long, default_value = "none")]
        script: Script,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify files and print their guessed encodings
    Detect {
        /// Files to classify
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Script hint (e.g. cyrillic, greek)
        #[arg(long, default_value = "none")]
        script: Script,

        /// Force this encoding for text files without a BOM
        #[arg(long)]
        encoding: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Dump { directory, output, base64, show_encoding, script, verbose } => {
            let config = DumpConfig {
                binary_mode: if base64 { BinaryMode::Base64 } else { BinaryMode::Skip },
                show_encoding,
                script_hint: script,
            };
            dump_directory(directory, output, config, verbose)?;
        }
        Commands::Detect { files, script, encoding } => {
            detect_files(files, script, encoding)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // RUST_LOG controls the level; logs go to stderr so dumps stay clean
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn dump_directory(
    directory: PathBuf,
    output: Option<PathBuf>,
    config: DumpConfig,
    verbose: bool,
) -> Result<()> {
    let dumper = Dumper::with_config(config);
    info!(directory = %directory.display(), "dumping");

    let summary = if let Some(output_path) = &output {
        dumper.dump_to_file(&directory, output_path)?
    } else {
        let stdout = io::stdout();
        dumper.dump_to_writer(&directory, BufWriter::new(stdout.lock()))?
    };

    if verbose {
        eprintln!(
            "Dumped: {} ({} directories, {} text, {} binary, {} unreadable)",
            directory.display(),
            summary.directories,
            summary.text_files,
            summary.binary_files,
            summary.unreadable
        );
        if let Some(output_path) = output {
            eprintln!("Written: {}", output_path.display());
        }
    }

    Ok(())
}

fn detect_files(files: Vec<PathBuf>, script: Script, encoding: Option<String>) -> Result<()> {
    let mut classifier = Classifier::new().with_script(script);
    if let Some(encoding) = encoding {
        classifier = classifier.with_encoding(encoding);
    }

    for path in &files {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let result = classifier.classify(&data);
        let kind = if result.is_binary { "binary" } else { "text" };

        println!(
            "{}  {}  {}  {}  {}",
            path.display(),
            result.encoding,
            result.source,
            result.script,
            kind
        );
    }

    Ok(())
}
