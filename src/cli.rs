use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "rungz")]
#[command(version)]
#[command(about = "A Rust gunzip utility with HTTP URL support", long_about = None)]
#[command(after_help = "Examples:\n  \
  rungz data.txt.gz               decompress to data.txt (or the stored name)\n  \
  rungz -c logs.gz | less         send decompressed contents to a pipe\n  \
  rungz -l https://example.com/dump.sql.gz   show header of a remote file")]
pub struct Cli {
    /// gzip file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// List header information instead of decompressing
    #[arg(short = 'l')]
    pub list: bool,

    /// Write output to stdout, no messages
    #[arg(short = 'c')]
    pub stdout: bool,

    /// Write output to this path
    #[arg(short = 'o', value_name = "OUT", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short = 'f')]
    pub force: bool,

    /// Use the name stored in the header for the output file
    #[arg(short = 'N')]
    pub stored_name: bool,

    /// Quiet mode
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Verbose logging (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet || self.stdout
    }

    /// Default log filter when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Output path when neither `-c` nor `-o` is given.
    ///
    /// With `-N` the stored header name wins (directories stripped);
    /// otherwise the input's last path segment without its `.gz`/`.tgz` suffix.
    pub fn default_output(&self, stored_name: Option<&str>) -> PathBuf {
        if self.stored_name {
            if let Some(name) = stored_name
                .and_then(|n| std::path::Path::new(n).file_name())
                .filter(|n| !n.is_empty())
            {
                return PathBuf::from(name);
            }
        }

        let base = self
            .file
            .trim_end_matches('/')
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file);

        if let Some(stem) = base.strip_suffix(".tgz") {
            PathBuf::from(format!("{stem}.tar"))
        } else if let Some(stem) = base.strip_suffix(".gz").filter(|s| !s.is_empty()) {
            PathBuf::from(stem)
        } else {
            PathBuf::from(format!("{base}.out"))
        }
    }
}
