mod config;
mod preview;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use shelfmark_core::model::CodeKind;
use shelfmark_core::{FrameSurface, Studio};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "shelfmark", version, about = "Shelf labels from spreadsheets")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every label of a spreadsheet to a print sheet
    Render {
        file: PathBuf,
        /// barcode or qr (overrides the config file)
        #[arg(short, long)]
        kind: Option<CodeKind>,
        #[arg(short, long, value_enum, default_value_t = Format::Svg)]
        format: Format,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Cards per row (SVG sheet only)
        #[arg(long)]
        columns: Option<u32>,
    },
    /// Print the records a spreadsheet yields
    List {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Browse labels in the terminal
    Preview {
        file: PathBuf,
        #[arg(short, long)]
        kind: Option<CodeKind>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// One SVG with every card laid out in a grid
    Svg,
    /// Printable HTML page, one SVG per card
    Html,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            file,
            kind,
            format,
            out,
            columns,
        } => {
            let mut style = config.style.clone();
            if let Some(columns) = columns {
                style = style.with_columns(columns);
            }
            let studio = open(&file, kind.unwrap_or(config.default_kind), style)?;
            report_failures(&studio);
            let document = match format {
                Format::Svg => studio.sheet_svg(),
                Format::Html => studio.print_html(),
            };
            match out {
                Some(path) => {
                    fs::write(&path, document)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("wrote {} labels to {}", studio.records().len(), path.display());
                }
                None => io::stdout().lock().write_all(document.as_bytes())?,
            }
        }
        Command::List { file, json } => {
            let studio = open(&file, config.default_kind, config.style)?;
            let mut stdout = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut stdout, studio.records())?;
                writeln!(stdout)?;
            } else {
                for record in studio.records() {
                    writeln!(
                        stdout,
                        "{:>5}  {:<6} {:<20} {} {} {}",
                        record.row,
                        record.arrow,
                        record.code,
                        record.shelf,
                        record.module,
                        record.level
                    )?;
                }
            }
        }
        Command::Preview { file, kind } => {
            let studio = open(&file, kind.unwrap_or(config.default_kind), config.style)?;
            if studio.records().is_empty() {
                bail!("{} has no labels to preview", file.display());
            }
            preview::run(studio, &file.display().to_string())?;
        }
    }
    Ok(())
}

/// Load `path` into a fresh studio, logging row issues.
fn open(
    path: &Path,
    kind: CodeKind,
    style: shelfmark_core::LabelStyle,
) -> Result<Studio<FrameSurface>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut studio = Studio::new(style)?.with_kind(kind);
    let ticket = studio.begin_load();
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let outcome = studio
        .finish_load(ticket, &bytes, source)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    for issue in &outcome.issues {
        log::warn!("{issue}");
    }
    log::info!(
        "{} labels from sheet '{}'",
        outcome.records,
        outcome.sheet_name
    );
    Ok(studio)
}

fn report_failures(studio: &Studio<FrameSurface>) {
    for (index, record) in studio.records().iter().enumerate() {
        if let Some(error) = studio.frame(index).and_then(|frame| frame.error) {
            log::warn!("row {}: cannot encode '{}': {error}", record.row, record.code);
        }
    }
}
