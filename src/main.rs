use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use chatmark::Config;

/// Config picked up from the working directory when `--config` is not given.
const LOCAL_CONFIG: &str = "chatmark.toml";

#[derive(Parser)]
#[command(name = "chatmark")]
#[command(about = "Render a chat message written in markdown to a content tree")]
struct Cli {
    /// Input message file (defaults to stdin)
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Config file (defaults to ./chatmark.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Html,
    Debug,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(Path::new(LOCAL_CONFIG)),
    };

    let message = read_input(cli.input.as_deref())?;
    let document = chatmark::render_with_config(message.as_str(), &config);
    log::info!("rendered {} blocks", document.len());

    let mut rendered = match cli.format {
        Format::Json if cli.pretty => serde_json::to_string_pretty(&document)?,
        Format::Json => serde_json::to_string(&document)?,
        Format::Html => chatmark::document_to_html(&document, &config.html),
        Format::Debug => format!("{:#?}", document),
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(())
}

/// Read the message; invalid UTF-8 is replaced rather than rejected.
fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => fs::read(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
