use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use statusmark_core::{ConvertOptions, Diagnostic, convert};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Converts post markup into styled text.
#[derive(Debug, Parser)]
#[command(name = "statusmark", version)]
struct Cli {
    /// HTML file to read; stdin when omitted.
    input: Option<PathBuf>,

    /// Drop this link when it ends the post.
    #[arg(long, value_name = "URL")]
    trailing_url: Option<Url>,

    /// Delete text marked with the `invisible` class.
    #[arg(long)]
    remove_invisible: bool,

    /// Keep link text but drop the link attributes.
    #[arg(long)]
    strip_links: bool,

    /// Resolve relative hrefs against this URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<Url>,

    /// Clean the markup with the allow-list sanitizer first.
    #[arg(long)]
    sanitized: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print parser repairs to stderr.
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let default_level = "error";
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let source = read_source(cli.input.as_ref())?;

    let options = ConvertOptions {
        trailing_url: cli.trailing_url,
        remove_invisible_spans: cli.remove_invisible,
        base_url: cli.base_url,
        sanitize: cli.sanitized,
    };
    let converted = convert(&source, &options);
    if cli.diagnostics {
        for diagnostic in &converted.diagnostics {
            eprintln!("{}", diagnostic_to_pretty(diagnostic));
        }
    }

    let mut styled = converted.styled;
    if cli.strip_links {
        styled = styled.removing_links();
    }

    match cli.format {
        OutputFormat::Text => println!("{}", styled.as_str()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&styled).context("failed to serialize styled text")?
        ),
    }
    Ok(())
}

fn read_source(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn diagnostic_to_pretty(diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{} {} {}",
        diagnostic.range.start.line + 1,
        diagnostic.range.start.character + 1,
        diagnostic.severity.label(),
        diagnostic.code,
        diagnostic.message
    )
}
