//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_probe() {
    let cli = parse(&["ranged", "probe", "https://example.com/disk.img"]);
    assert!(cli.block_size.is_none());
    match cli.command {
        CliCommand::Probe { url } => assert_eq!(url, "https://example.com/disk.img"),
        _ => panic!("expected Probe"),
    }
}

#[test]
fn cli_parse_cat_defaults() {
    match parse(&["ranged", "cat", "http://h/f"]).command {
        CliCommand::Cat {
            url,
            offset,
            length,
            chunk_size,
            output,
        } => {
            assert_eq!(url, "http://h/f");
            assert_eq!(offset, 0);
            assert!(length.is_none());
            assert_eq!(chunk_size, 1_048_576);
            assert!(output.is_none());
        }
        _ => panic!("expected Cat"),
    }
}

#[test]
fn cli_parse_cat_window_and_output() {
    let cli = parse(&[
        "ranged",
        "cat",
        "http://h/f",
        "--offset",
        "131072",
        "--length",
        "4096",
        "--chunk-size",
        "512",
        "-o",
        "out.bin",
        "--block-size",
        "65536",
    ]);
    assert_eq!(cli.block_size, Some(65_536));
    match cli.command {
        CliCommand::Cat {
            offset,
            length,
            chunk_size,
            output,
            ..
        } => {
            assert_eq!(offset, 131_072);
            assert_eq!(length, Some(4096));
            assert_eq!(chunk_size, 512);
            assert_eq!(output, Some(PathBuf::from("out.bin")));
        }
        _ => panic!("expected Cat"),
    }
}

#[test]
fn cli_rejects_missing_url() {
    assert!(Cli::try_parse_from(["ranged", "cat"]).is_err());
    assert!(Cli::try_parse_from(["ranged", "probe"]).is_err());
}
