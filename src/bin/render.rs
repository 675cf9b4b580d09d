//! tutor-render: render tutoring content from a file or stdin to HTML.
//!
//! Run with: cargo run --bin tutor-render --features cli -- lesson.md
//! Or: echo '$x^2$' | cargo run --bin tutor-render --features cli

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use tutor_content::{segment, ContentRenderer, HtmlConfig, QuestionSolution, TopicLesson};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// A single content string
    Text,
    /// A question solution JSON payload
    Solution,
    /// A topic lesson JSON payload
    Lesson,
    /// Print the segments of a content string as JSON
    Segments,
}

#[derive(Parser)]
#[command(name = "tutor-render")]
#[command(about = "Render tutoring content with math and tables to HTML")]
struct Cli {
    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// What the input contains
    #[arg(short, long, value_enum, default_value = "text")]
    mode: Mode,

    /// Renderer configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit a complete HTML document
    #[arg(short, long)]
    standalone: bool,

    /// Output file (writes stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> tutor_content::Result<()> {
    let mut config = match &cli.config {
        Some(path) => HtmlConfig::from_file(path)?,
        None => HtmlConfig::default(),
    };
    if cli.standalone {
        config.standalone = true;
    }
    debug!(?config, "loaded configuration");

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let renderer = ContentRenderer::new(config);
    let output = match cli.mode {
        Mode::Text => renderer.render(Some(&input)),
        Mode::Solution => QuestionSolution::from_json(&input)?.to_html(&renderer),
        Mode::Lesson => TopicLesson::from_json(&input)?.to_html(&renderer),
        Mode::Segments => serde_json::to_string_pretty(&segment(&input))
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?,
    };

    match &cli.output {
        Some(path) => fs::write(path, output)?,
        None => println!("{}", output),
    }

    Ok(())
}
