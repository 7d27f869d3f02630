//! Command-line entry point: prints the line count of one file.
//!
//! ```shell
//! chunk-line-count server.log --skipBlank
//! chunk-line-count --filePath data.txt --lineSeparator 'HII' --bufferSize 4096
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use chunk_line_count::CountError;
use chunk_line_count::CountOptions;
use chunk_line_count::count;
use chunk_line_count::parse_buffer_size;
use chunk_line_count::separator::unescape;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use clap_verbosity_flag::WarnLevel;

/// Count the lines of a file, reading it in chunks.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The file to count.
    #[arg(value_name = "FILE_PATH", required_unless_present = "file_path")]
    positional: Option<PathBuf>,

    /// The file to count; takes precedence over the positional argument.
    #[arg(long = "filePath", value_name = "PATH")]
    file_path: Option<PathBuf>,

    /// Line separator; `\n`, `\r`, `\t` and `\\` are unescaped. Detected when absent.
    #[arg(long = "lineSeparator", value_name = "SEP", allow_hyphen_values = true)]
    line_separator: Option<String>,

    /// Bytes read per chunk.
    #[arg(long = "bufferSize", value_name = "N")]
    buffer_size: Option<String>,

    /// Do not count blank lines.
    #[arg(long = "skipBlank")]
    skip_blank: bool,

    /// Do not count the empty line after a separator that ends the file.
    #[arg(long = "skipEndingLineBreak")]
    skip_ending_line_break: bool,

    /// Decompress the file as gzip before counting.
    #[arg(long)]
    gzip: bool,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match run(cli) {
        Ok(lines) => {
            println!("{lines}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<u64> {
    let path = cli
        .file_path
        .or(cli.positional)
        .context("no file path given")?;

    let mut opts = CountOptions::new(&path)
        .skip_blank(cli.skip_blank)
        .skip_ending_line_break(cli.skip_ending_line_break)
        .gzip(cli.gzip);
    if let Some(raw) = cli.line_separator.as_deref() {
        opts = opts.line_separator(unescape(raw));
    }
    if let Some(raw) = cli.buffer_size.as_deref() {
        opts = opts.buffer_size(parse_buffer_size(raw).map_err(CountError::from)?);
    }

    count(&opts).with_context(|| format!("counting lines of `{}`", path.display()))
}
