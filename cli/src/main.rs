//! pageflow CLI - render cached OCR/layout results in reading order

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pageflow::fetch::{read_cache_file, CacheMap, PageCache};
use pageflow::render::{self, PageExport, COMBINED_FILE, PAGES_FILE};
use pageflow::{
    analyze_cached, analyze_json, CleanupPreset, JsonFormat, LayoutOptions, PageSelection,
    PageSnapshot, RenderOptions,
};

#[derive(Parser)]
#[command(name = "pageflow")]
#[command(version)]
#[command(about = "Reconstruct reading order from cached OCR/layout results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a cached document as text, Markdown, or JSON
    Render {
        #[command(flatten)]
        source: CacheSource,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Export per-page text (pages.json) and combined text (combined.txt)
    Export {
        #[command(flatten)]
        source: CacheSource,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show cached pages and their structure
    Info {
        #[command(flatten)]
        source: CacheSource,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Analyze a single raw layout result file
    Page {
        /// Layout result JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Source page index to record
        #[arg(long, default_value = "0")]
        index: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

/// Where to find the cache file.
#[derive(Args)]
struct CacheSource {
    /// Cache file (alternatively use --document)
    #[arg(value_name = "CACHE", required_unless_present = "document")]
    cache: Option<PathBuf>,

    /// Document name, resolved to <cache-dir>/<name>.json
    #[arg(short, long, conflicts_with = "cache")]
    document: Option<String>,

    /// Cache directory used with --document
    #[arg(long, env = "PAGEFLOW_CACHE_DIR", value_name = "DIR")]
    cache_dir: Option<PathBuf>,
}

impl CacheSource {
    fn path(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if let Some(path) = &self.cache {
            return Ok(path.clone());
        }
        let document = self
            .document
            .as_deref()
            .ok_or("either a cache file or --document is required")?;
        let cache = match &self.cache_dir {
            Some(dir) => PageCache::open(dir, document),
            None => PageCache::for_document(document),
        };
        Ok(cache.path().to_path_buf())
    }

    fn load(&self) -> Result<(PathBuf, CacheMap), Box<dyn std::error::Error>> {
        let path = self.path()?;
        let cache = read_cache_file(&path)?;
        log::debug!("Loaded {} cached pages from {}", cache.len(), path.display());
        Ok((path, cache))
    }
}

#[derive(Args)]
struct RenderArgs {
    /// Text cleanup preset
    #[arg(long, value_enum)]
    cleanup: Option<CleanupLevel>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Label for page header lines
    #[arg(long, default_value = "Page")]
    label: String,

    /// Omit page header lines
    #[arg(long)]
    no_header: bool,

    /// Keep words split by "- "
    #[arg(long)]
    keep_hyphens: bool,
}

impl RenderArgs {
    fn options(&self) -> Result<RenderOptions, Box<dyn std::error::Error>> {
        let page_selection = match &self.pages {
            Some(p) => PageSelection::parse(p)?,
            None => PageSelection::All,
        };

        let mut options = RenderOptions::new()
            .with_pages(page_selection)
            .with_page_label(self.label.clone())
            .with_page_header(!self.no_header)
            .with_hyphenation_fix(!self.keep_hyphens);

        if let Some(level) = self.cleanup {
            options = options.with_cleanup_preset(level.into());
        }
        Ok(options)
    }
}

#[derive(Args)]
struct LayoutArgs {
    /// Titles at or below this fraction of the page height become section dividers
    #[arg(long, default_value = "0.5")]
    title_threshold: f64,

    /// Per-edge tolerance when matching paragraphs against table cells
    #[arg(long, default_value = "0.0")]
    table_tolerance: f64,

    /// Disable parallel page analysis
    #[arg(long)]
    sequential: bool,
}

impl LayoutArgs {
    fn options(&self) -> LayoutOptions {
        LayoutOptions::new()
            .with_title_threshold(self.title_threshold)
            .with_table_tolerance(self.table_tolerance)
            .with_parallel(!self.sequential)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain text
    Text,
    /// Markdown
    #[value(alias = "md")]
    Markdown,
    /// JSON page structure
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Minimal cleanup (Unicode normalization only)
    Minimal,
    /// Standard cleanup (default)
    Standard,
    /// Aggressive cleanup (also strips private-use glyphs)
    Aggressive,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
            CleanupLevel::Aggressive => CleanupPreset::Aggressive,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render {
            source,
            format,
            output,
            compact,
            render,
            layout,
        }) => cmd_render(&source, format, output.as_deref(), compact, &render, &layout),
        Some(Commands::Export {
            source,
            output,
            render,
            layout,
        }) => cmd_export(&source, &output, &render, &layout),
        Some(Commands::Info { source, layout }) => cmd_info(&source, &layout),
        Some(Commands::Page {
            input,
            index,
            format,
            render,
            layout,
        }) => cmd_page(&input, index, format, &render, &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pageflow <COMMAND> <CACHE>".yellow());
            println!("       pageflow --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn render_pages(
    pages: &[PageSnapshot],
    format: OutputFormat,
    compact: bool,
    options: &RenderOptions,
) -> pageflow::Result<String> {
    match format {
        OutputFormat::Text => render::to_text(pages, options),
        OutputFormat::Markdown => render::to_markdown(pages, options),
        OutputFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let selected: Vec<PageSnapshot> = pages
                .iter()
                .filter(|p| options.page_selection.includes_number(p.page_number))
                .cloned()
                .collect();
            render::to_json(&selected, json_format)
        }
    }
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_render(
    source: &CacheSource,
    format: OutputFormat,
    output: Option<&Path>,
    compact: bool,
    render: &RenderArgs,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let render_options = render.options()?;
    let (_, cache) = source.load()?;
    let pages = analyze_cached(&cache, &layout.options());

    let content = render_pages(&pages, format, compact, &render_options)?;
    write_output(&content, output)
}

fn cmd_export(
    source: &CacheSource,
    output: &Path,
    render: &RenderArgs,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let render_options = render.options()?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading cache...");
    let (path, cache) = source.load()?;
    pb.inc(1);

    pb.set_message(format!("Analyzing {} pages...", cache.len()));
    let pages = analyze_cached(&cache, &layout.options());
    pb.inc(1);

    pb.set_message("Writing export...");
    let export = PageExport::from_pages(&pages, &render_options);
    export.write_to(output)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} pages from {}",
        "Exported".green().bold(),
        export.len(),
        path.display()
    );
    println!("  {} {}", "├─".dimmed(), PAGES_FILE);
    println!("  {} {}", "└─".dimmed(), COMBINED_FILE);

    Ok(())
}

fn cmd_info(source: &CacheSource, layout: &LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (path, cache) = source.load()?;
    let pages = analyze_cached(&cache, &layout.options());

    println!("{}", "Cache Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), path.display());
    println!("{}: {}", "Cached pages".bold(), cache.len());
    if let Some((first, last)) = cache.keys().next().zip(cache.keys().next_back()) {
        println!("{}: {}..={}", "Index range".bold(), first, last);
    }
    if let Some(latest) = cache.values().map(|e| e.fetched_at).max() {
        println!("{}: {}", "Last fetched".bold(), latest.to_rfc3339());
    }
    let undecodable = cache.len() - pages.len();
    if undecodable > 0 {
        println!("{}: {}", "Undecodable".bold().red(), undecodable);
    }

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for page in &pages {
        let printed = page
            .logical_page_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {} {:>5}  {} {:>3}  {} {:>4}",
            page.source_page_index,
            "page".dimmed(),
            printed,
            "sections".dimmed(),
            page.sections.len(),
            "paragraphs".dimmed(),
            page.paragraph_count()
        );
    }

    Ok(())
}

fn cmd_page(
    input: &Path,
    index: u32,
    format: OutputFormat,
    render: &RenderArgs,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read_to_string(input)?;
    let value: serde_json::Value = serde_json::from_str(&data)?;
    let page = analyze_json(index, &value, &layout.options())?;

    let content = render_pages(&[page], format, false, &render.options()?)?;
    write_output(&content, None)
}

fn cmd_version() {
    println!("{} {}", "pageflow".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reading-order reconstruction for OCR/layout output");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "pageflow",
            "render",
            "doc.json",
            "--format",
            "md",
            "--pages",
            "1-3",
            "--title-threshold",
            "0.4",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Render {
                source,
                format,
                render,
                layout,
                ..
            }) => {
                assert_eq!(source.path().unwrap(), PathBuf::from("doc.json"));
                assert!(format == OutputFormat::Markdown);
                assert_eq!(
                    render.options().unwrap().page_selection,
                    PageSelection::Range(1..=3)
                );
                assert_eq!(layout.options().title_promotion_threshold, 0.4);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_document_resolves_in_cache_dir() {
        let cli = Cli::try_parse_from([
            "pageflow",
            "info",
            "--document",
            "report",
            "--cache-dir",
            "/tmp/pf",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Info { source, .. }) => {
                assert_eq!(source.path().unwrap(), PathBuf::from("/tmp/pf/report.json"));
            }
            _ => panic!("expected info command"),
        }
    }

    #[test]
    fn test_invalid_page_range_rejected() {
        let args = RenderArgs {
            cleanup: None,
            pages: Some("a-b".to_string()),
            label: "Page".to_string(),
            no_header: false,
            keep_hyphens: false,
        };
        let err = args.options().unwrap_err();
        assert!(err.to_string().starts_with("Invalid page range:"));
    }

    #[test]
    fn test_export_command_writes_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache_path = dir.path().join("doc.json");
        let cache = serde_json::json!({
            "0": {
                "page_index": 0,
                "fetched_at": "2024-01-01T00:00:00Z",
                "result": {
                    "paragraphs": [
                        {"content": "Hello", "boundingRegions": [{"pageNumber": 1, "polygon": [0.1, 0.1, 0.9, 0.1, 0.9, 0.2, 0.1, 0.2]}]},
                        {"content": "World", "boundingRegions": [{"pageNumber": 1, "polygon": [0.1, 0.3, 0.9, 0.3, 0.9, 0.4, 0.1, 0.4]}]}
                    ]
                }
            }
        });
        fs::write(&cache_path, cache.to_string()).unwrap();

        let out = dir.path().join("out");
        let cli = Cli::try_parse_from([
            "pageflow",
            "export",
            cache_path.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Export {
                source,
                output,
                render,
                layout,
            }) => cmd_export(&source, &output, &render, &layout).unwrap(),
            _ => panic!("expected export command"),
        }

        let combined = fs::read_to_string(out.join(COMBINED_FILE)).unwrap();
        assert_eq!(combined, "Page 0:\n\nHello\nWorld");
    }
}
