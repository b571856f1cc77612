use anyhow::{bail, Context};
use clap::Parser;
use sdevice_basics::diag::print::DiagPrinter;
use sdevice_basics::diag::{DiagRegistry, DiagSystem};
use sdevice_basics::source::SourceManager;
use sdevice_scanner::diags;
use sdevice_scanner::outline::{CommentMode, Outline};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "sdevice-outline")]
#[command(about = "Lists the directives and comments of sdevice command files")]
struct Cli {
    /// Command files to read
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Reject `#` comments, accepting directives only
    #[arg(long)]
    no_comments: bool,
    /// Only report diagnostics, without listing tokens
    #[arg(short, long)]
    quiet: bool,
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.no_comments {
        CommentMode::Forbidden
    } else {
        CommentMode::Allowed
    };
    let sm = SourceManager::new();
    let mut registry = DiagRegistry::new();
    diags::register_diags(&mut registry);
    let sink = DiagPrinter::new(&sm);
    let diag_system = DiagSystem::new(&registry, &sink);
    for path in &cli.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let chunk = sm.add_file(path.display().to_string(), text);
        debug!(file = %chunk.file_name, ?mode, "outlining");
        for token in Outline::new(chunk, &diag_system, mode) {
            if cli.quiet {
                continue;
            }
            println!("{}", token);
        }
    }
    match diag_system.error_count() {
        0 => Ok(()),
        1 => bail!("found 1 error"),
        n => bail!("found {} errors", n),
    }
}
