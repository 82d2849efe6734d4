//! `ranged cat <url>` – read a byte window through the block cache.

use anyhow::{Context, Result};
use ranged_core::{LoggingReader, RangeReader, ReadAt, ReaderOptions};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CatArgs {
    pub offset: u64,
    pub length: Option<u64>,
    pub chunk_size: usize,
    pub output: Option<PathBuf>,
}

pub async fn run_cat(url: &str, options: ReaderOptions, args: CatArgs) -> Result<()> {
    let written = tokio::task::spawn_blocking({
        let url = url.to_string();
        move || -> Result<u64> {
            let reader = LoggingReader::new(
                RangeReader::open_with(&url, options).with_context(|| format!("open {}", url))?,
            );
            match &args.output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("create {}", path.display()))?;
                    let mut out = BufWriter::new(file);
                    let n = copy_window(&reader, args.offset, args.length, args.chunk_size, &mut out)?;
                    out.flush()?;
                    Ok(n)
                }
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    let n = copy_window(&reader, args.offset, args.length, args.chunk_size, &mut out)?;
                    out.flush()?;
                    Ok(n)
                }
            }
        }
    })
    .await
    .context("cat task join")??;

    tracing::info!(url, written, "cat finished");
    Ok(())
}

/// Copy `[offset, offset + length)` (or to the end) from `reader` to `out`
/// in `chunk_size` reads. Returns the bytes written.
pub(crate) fn copy_window<R: ReadAt, W: Write>(
    reader: &R,
    offset: u64,
    length: Option<u64>,
    chunk_size: usize,
    out: &mut W,
) -> Result<u64> {
    if chunk_size == 0 {
        anyhow::bail!("chunk size must be greater than zero");
    }
    let end = match length {
        Some(len) => offset.saturating_add(len).min(reader.size()),
        None => reader.size(),
    };

    let mut buf = vec![0u8; chunk_size];
    let mut pos = offset;
    while pos < end {
        let want = usize::try_from(end - pos).map_or(chunk_size, |n| n.min(chunk_size));
        let n = reader
            .read_at(&mut buf[..want], pos)
            .with_context(|| format!("read {} bytes at offset {}", want, pos))?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        pos += n as u64;
    }
    Ok(pos.saturating_sub(offset))
}
