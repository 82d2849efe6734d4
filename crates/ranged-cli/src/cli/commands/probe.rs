//! `ranged probe <url>` – show what the HEAD probe learns.

use anyhow::{Context, Result};
use ranged_core::blocks::BlockLayout;
use ranged_core::{probe, ReaderOptions};

pub async fn run_probe(url: &str, options: &ReaderOptions) -> Result<()> {
    let head = tokio::task::spawn_blocking({
        let url = url.to_string();
        let http = options.http.clone();
        move || probe::probe(&url, &http)
    })
    .await
    .context("probe task join")??;

    let size = head
        .content_length
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let blocks = head
        .content_length
        .map(|s| BlockLayout::new(s, options.block_size).block_count().to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("{:<15} {}", "URL", url);
    println!("{:<15} {}", "SIZE", size);
    println!("{:<15} {} x {}", "BLOCKS", blocks, options.block_size);
    println!("{:<15} {}", "ACCEPT-RANGES", if head.accept_ranges { "bytes" } else { "none" });
    println!("{:<15} {}", "ETAG", head.etag.as_deref().unwrap_or("-"));
    println!(
        "{:<15} {}",
        "LAST-MODIFIED",
        head.last_modified.as_deref().unwrap_or("-")
    );
    println!(
        "{:<15} {}",
        "CONTENT-TYPE",
        head.content_type.as_deref().unwrap_or("-")
    );
    Ok(())
}
