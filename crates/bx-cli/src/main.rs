#![forbid(unsafe_code)]

//! blueprint-extract CLI - pull structured data out of LLM blueprint output.
//!
//! # Commands
//!
//! - `sections`: extract named blueprint sections from markdown
//! - `tech-stack`: parse the recommended-tech-stack section into records
//! - `flowchart`: parse Mermaid flowchart source into a laid-out graph (JSON)
//! - `blueprint`: render structured blueprint JSON as the markdown narrative
//! - `schema`: render database schema JSON as Postgres CREATE TABLE statements

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use bx_core::Section;
use bx_layout::{GridConfig, GridLayout, layout_grid_with_config};
use bx_markdown::{Blueprint, BulletStyle, SectionKind, extract_section, parse_tech_stack_report};
use bx_mermaid::parse_flowchart;
use bx_schema::Schema;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info, warn};

/// blueprint-extract CLI.
#[derive(Debug, Parser)]
#[command(
    name = "bx",
    version,
    about = "Extract structured data from LLM-generated blueprints",
    long_about = "Best-effort extractors for LLM output: named markdown sections,\n\
        tech-stack bullet lists, and Mermaid graph-TD flowcharts with a\n\
        deterministic grid layout."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract named sections from a markdown blueprint.
    Sections {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Extract a single section instead of all known ones.
        #[arg(short, long, value_enum)]
        section: Option<SectionArg>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse the recommended-tech-stack section into structured records.
    TechStack {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Bullet grammar variant
        #[arg(long, value_enum, default_value = "paren")]
        style: StyleArg,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse Mermaid flowchart source into a grid-laid-out graph (JSON).
    Flowchart {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Horizontal spacing between grid columns
        #[arg(long, default_value_t = 250.0)]
        column_gap: f32,

        /// Vertical spacing between grid rows
        #[arg(long, default_value_t = 150.0)]
        row_gap: f32,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Render structured blueprint JSON as a markdown narrative.
    Blueprint {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Render database schema JSON as Postgres CREATE TABLE statements.
    Schema {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum SectionArg {
    MainGoal,
    UserFlow,
    MvpFeatures,
    TechStack,
}

impl From<SectionArg> for SectionKind {
    fn from(value: SectionArg) -> Self {
        match value {
            SectionArg::MainGoal => Self::MainGoal,
            SectionArg::UserFlow => Self::UserFlow,
            SectionArg::MvpFeatures => Self::MvpFeatures,
            SectionArg::TechStack => Self::TechStack,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum StyleArg {
    /// `- **Category:** Tech - (reason)`
    Paren,
    /// `- **Category:** [Tech] - [reason]`
    Bracketed,
}

impl From<StyleArg> for BulletStyle {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::Paren => Self::ParenReason,
            StyleArg::Bracketed => Self::BracketedPair,
        }
    }
}

#[derive(Debug, Serialize)]
struct SectionEntry {
    kind: &'static str,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct FlowchartResult {
    #[serde(flatten)]
    layout: GridLayout,
    warnings: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Sections {
            input,
            section,
            json,
            pretty,
        } => cmd_sections(&input, section, json, pretty),

        Command::TechStack {
            input,
            style,
            pretty,
        } => cmd_tech_stack(&input, style, pretty),

        Command::Flowchart {
            input,
            column_gap,
            row_gap,
            pretty,
        } => cmd_flowchart(&input, column_gap, row_gap, pretty),

        Command::Blueprint { input, output } => cmd_blueprint(&input, output.as_deref()),

        Command::Schema { input, output } => cmd_schema(&input, output.as_deref()),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .try_init();
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline source text
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

fn cmd_sections(
    input: &str,
    section: Option<SectionArg>,
    json: bool,
    pretty: bool,
) -> Result<()> {
    let document = load_input(input)?;

    let kinds: Vec<SectionKind> = match section {
        Some(arg) => vec![arg.into()],
        None => SectionKind::ALL.to_vec(),
    };

    let mut entries = Vec::new();
    for kind in &kinds {
        match extract_section(&document, *kind) {
            Some(Section { title, body }) => entries.push(SectionEntry {
                kind: kind.as_str(),
                title,
                body,
            }),
            None => warn!("No heading matched section '{}'", kind.as_str()),
        }
    }

    if section.is_some() && entries.is_empty() {
        bail!("section not found in input");
    }

    if json {
        let rendered = to_json(&entries, pretty)?;
        println!("{rendered}");
    } else {
        for entry in &entries {
            println!("== {} ({}) ==", entry.kind, entry.title);
            println!("{}\n", entry.body);
        }
    }
    Ok(())
}

fn cmd_tech_stack(input: &str, style: StyleArg, pretty: bool) -> Result<()> {
    let document = load_input(input)?;
    let report = parse_tech_stack_report(&document, style.into());

    if report.skipped_lines > 0 {
        warn!(
            "{} line(s) in the tech-stack section did not match the bullet grammar",
            report.skipped_lines
        );
    }
    debug!("Parsed {} tech-stack item(s)", report.items.len());

    let rendered = to_json(&report, pretty)?;
    println!("{rendered}");
    Ok(())
}

fn cmd_flowchart(input: &str, column_gap: f32, row_gap: f32, pretty: bool) -> Result<()> {
    let source = load_input(input)?;
    let parsed = parse_flowchart(&source);

    for warning in &parsed.warnings {
        warn!("Parse warning: {warning}");
    }
    debug!(
        "Parsed flowchart: nodes={}, edges={}",
        parsed.graph.nodes.len(),
        parsed.graph.edges.len()
    );

    let config = GridConfig {
        column_gap,
        row_gap,
    };
    let layout = layout_grid_with_config(&parsed.graph, config);

    let result = FlowchartResult {
        layout,
        warnings: parsed.warnings,
    };
    let rendered = to_json(&result, pretty)?;
    println!("{rendered}");
    Ok(())
}

fn cmd_blueprint(input: &str, output: Option<&str>) -> Result<()> {
    let source = load_input(input)?;
    let blueprint = Blueprint::from_json(&source).context("Failed to decode blueprint JSON")?;
    let markdown = blueprint.to_markdown();
    write_output(output, &markdown)?;
    if output.is_none() {
        println!();
    }
    Ok(())
}

fn cmd_schema(input: &str, output: Option<&str>) -> Result<()> {
    let source = load_input(input)?;
    let schema = Schema::from_json(&source).context("Failed to decode schema JSON")?;
    debug!("Decoded {} table(s)", schema.tables.len());
    let sql = schema.to_sql();
    write_output(output, &sql)?;
    if output.is_none() {
        println!();
    }
    Ok(())
}
