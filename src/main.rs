//! Main entry point for the rungz CLI application.
//!
//! This binary decompresses gzip files from the local filesystem or from
//! HTTP URLs, or prints their header metadata.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rungz::gzip::write_file;
use rungz::{Cli, ContainerDescriptor, GzipExtractor, HttpRangeReader, LocalFileReader, ReadAt};

/// Application entry point.
///
/// Parses command-line arguments, installs the log subscriber and
/// dispatches on whether the input is a local file or HTTP URL.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.is_http_url() {
        let reader = Arc::new(HttpRangeReader::new(cli.file.clone()).await?);

        process_gzip(reader.clone(), &cli).await?;

        if !cli.is_quiet() {
            eprintln!(
                "\nTotal bytes transferred: {}",
                format_size(reader.transferred_bytes())
            );
        }
    } else {
        let reader = Arc::new(LocalFileReader::new(Path::new(&cli.file))?);
        process_gzip(reader, &cli).await?;
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides the level picked by `-v`.
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Process a gzip file based on CLI options.
///
/// - List mode (`-l`): print header metadata
/// - Pipe mode (`-c`): write the decompressed bytes to stdout
/// - Otherwise: write the decompressed bytes to a file
async fn process_gzip<R: ReadAt + 'static>(reader: Arc<R>, cli: &Cli) -> Result<()> {
    let extractor = GzipExtractor::new(reader);

    if cli.list {
        let header = extractor.header().await?;
        print_header(&header);
        return Ok(());
    }

    if cli.stdout {
        return extractor.extract_to_stdout().await;
    }

    // The stored name is only known once the source has been read
    if cli.output.is_none() && cli.stored_name {
        let (header, data) = extractor.extract().await?;
        let output_path = cli.default_output(header.file_name.as_deref());
        check_overwrite(&output_path, cli)?;
        if !cli.is_quiet() {
            println!("  inflating: {}", output_path.display());
        }
        return write_file(&output_path, &data).await;
    }

    let output_path = cli.output.clone().unwrap_or_else(|| cli.default_output(None));
    check_overwrite(&output_path, cli)?;
    if !cli.is_quiet() {
        println!("  inflating: {}", output_path.display());
    }

    extractor.extract_to_file(&output_path).await
}

/// Refuse to replace an existing file unless `-f` was given.
fn check_overwrite(output_path: &Path, cli: &Cli) -> Result<()> {
    if output_path.exists() && !cli.force {
        bail!(
            "{} already exists (use -f to overwrite)",
            output_path.display()
        );
    }
    Ok(())
}

/// Print gzip header fields, one per line.
fn print_header(header: &ContainerDescriptor) {
    let flags = header.flags;
    println!("{:<12} {}", "method:", "deflate");
    println!("{:<12} {:#04x}", "flags:", flags.bits());
    println!("{:<12} {}", "text:", flags.is_text());
    println!("{:<12} {}", "mtime:", header.modification_time);
    println!("{:<12} {}", "xfl:", header.extra_flags);
    println!("{:<12} {}", "os:", header.operating_system().name());
    if let Some(len) = header.extra_field_len {
        println!("{:<12} {} bytes", "extra:", len);
    }
    if let Some(name) = &header.file_name {
        println!("{:<12} {}", "name:", name);
    }
    if let Some(comment) = &header.comment {
        println!("{:<12} {}", "comment:", comment);
    }
    if flags.has_header_crc() {
        println!("{:<12} {:#06x}", "header crc:", header.header_checksum);
    }
    println!("{:<12} {}", "payload at:", header.payload_offset);
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
