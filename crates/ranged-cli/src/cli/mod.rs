//! CLI for ranged.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ranged_core::config;
use std::path::PathBuf;

use commands::{run_cat, run_probe, CatArgs};

/// Top-level CLI for ranged.
#[derive(Debug, Parser)]
#[command(name = "ranged")]
#[command(about = "ranged: random-access reads of remote files over HTTP ranges", long_about = None)]
pub struct Cli {
    /// Override the configured cache block size (bytes).
    #[arg(long, global = true, value_name = "BYTES")]
    pub block_size: Option<u64>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe a URL with HEAD and print its size and range support.
    Probe {
        /// Direct HTTP/HTTPS URL.
        url: String,
    },

    /// Read a byte window of a remote file and write it to stdout or a file.
    Cat {
        /// Direct HTTP/HTTPS URL.
        url: String,
        /// First byte to read.
        #[arg(long, default_value = "0")]
        offset: u64,
        /// Number of bytes to read (default: up to the end of the file).
        #[arg(long)]
        length: Option<u64>,
        /// Bytes per read_at call.
        #[arg(long, default_value = "1048576", value_name = "BYTES")]
        chunk_size: usize,
        /// Write here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if let Some(block_size) = cli.block_size {
            cfg.block_size = block_size;
        }
        tracing::debug!("loaded config: {:?}", cfg);
        let options = cfg.reader_options()?;

        match cli.command {
            CliCommand::Probe { url } => run_probe(&url, &options).await?,
            CliCommand::Cat {
                url,
                offset,
                length,
                chunk_size,
                output,
            } => {
                let args = CatArgs {
                    offset,
                    length,
                    chunk_size,
                    output,
                };
                run_cat(&url, options, args).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
