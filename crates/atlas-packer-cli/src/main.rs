use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use atlas_packer_core::{
    AtlasPacker, AtlasRect, BestOrder, PackResult, PackerConfig, RectOrder, pack_with_best_order,
};
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

mod export;

use export::ExportMeta;

#[derive(Parser, Debug)]
#[command(
    name = "atlas-packer",
    about = "Pack rectangles into growable texture atlases",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute an atlas layout and export it as JSON
    Pack(PackArgs),
    /// Pack once per sort order and print timing + fill ratio
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct InputArgs {
    /// Rect list (.json/.yaml/.yml) or a directory of images
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output file (defaults to stdout)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    /// Gap kept right of and below every rect
    #[arg(long, default_value_t = 2, help_heading = "Layout")]
    padding: u32,
    /// Max atlas size per axis
    #[arg(long, default_value_t = 4096, help_heading = "Layout")]
    max_size: u32,
    /// Sort order: best | height_then_width | width_then_height | area_then_height | area_then_width
    #[arg(long, default_value = "best", help_heading = "Layout")]
    order: String,
    /// Evaluate sort orders in parallel (requires feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    parallel: bool,

    /// Metadata layout: array | hash
    #[arg(long, default_value = "array", value_parser = ["array", "hash"], help_heading = "Export")]
    format: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, default_value_t = 2)]
    padding: u32,
    #[arg(long, default_value_t = 4096)]
    max_size: u32,
    /// Repetitions per order; the fastest run is reported
    #[arg(long, default_value_t = 3)]
    runs: u32,
}

/// Order selection: a fixed order, or the search over all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderChoice {
    Best,
    Fixed(RectOrder),
}

fn parse_order(s: &str) -> anyhow::Result<OrderChoice> {
    if s.eq_ignore_ascii_case("best") {
        return Ok(OrderChoice::Best);
    }
    s.parse::<RectOrder>()
        .map(OrderChoice::Fixed)
        .map_err(|_| anyhow::anyhow!("unknown order: {}", s))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Pack(args) => run_pack(args, show_progress),
        Commands::Bench(b) => run_bench(b, show_progress),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = PackerConfig {
        padding: cli.padding,
        max_size: cli.max_size,
        parallel: cli.parallel,
    };
    let mut order = parse_order(&cli.order)?;
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        order = y.apply(&mut cfg, order)?;
    }
    cfg.validate()?;

    if cli.print_config {
        let merged = MergedConfig {
            cfg: &cfg,
            order: match order {
                OrderChoice::Best => "best",
                OrderChoice::Fixed(o) => o.as_str(),
            },
        };
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&merged)?),
            _ => println!("{}", serde_json::to_string_pretty(&merged)?),
        }
        return Ok(());
    }

    let rects = load_rects(&cli.input, show_progress)?;
    info!(count = rects.len(), "loaded input rects");

    let start = Instant::now();
    let best = match order {
        OrderChoice::Best => pack_with_best_order(&rects, &cfg),
        OrderChoice::Fixed(o) => {
            let result = AtlasPacker::new(cfg.clone()).pack_rects(&rects, o);
            BestOrder {
                fill_ratio: result.average_fill_ratio(),
                result,
                order: o,
            }
        }
    };
    info!(
        atlases = best.result.atlases.len(),
        not_packed = best.result.not_packed.len(),
        order = %best.order,
        fill_ratio = best.fill_ratio,
        elapsed = %fmt_dur(start.elapsed()),
        "packing done"
    );
    for r in &best.result.not_packed {
        warn!(id = %r.id, width = r.bounds.w, height = r.bounds.h, "not packed");
    }

    let meta = ExportMeta {
        searched: order == OrderChoice::Best,
        ..ExportMeta::from_best(&cfg, &best)
    };
    let value = match cli.format.as_str() {
        "hash" => export::to_json_hash(&best.result, &meta),
        _ => export::to_json_array(&best.result, &meta),
    };
    let json = serde_json::to_string_pretty(&value)?;

    match (&cli.out, cli.dry_run) {
        (Some(path), false) => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(?path, atlases = best.result.atlases.len(), "layout written");
        }
        (Some(_), true) => {}
        (None, _) => println!("{}", json),
    }

    if let Some(stats_path) = &cli.export_stats {
        write_stats(&best.result, stats_path, cli.dry_run)?;
    }
    Ok(())
}

fn write_stats(result: &PackResult<String>, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let stats = result.stats();
    if dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }
    fs::write(path, serde_json::to_string_pretty(&stats)?)
        .with_context(|| format!("write {}", path.display()))?;
    info!(?path, "stats exported");
    Ok(())
}

fn run_bench(b: &BenchArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = PackerConfig {
        padding: b.padding,
        max_size: b.max_size,
        parallel: false,
    };
    cfg.validate()?;
    let rects = load_rects(&b.input, show_progress)?;
    let runs = b.runs.max(1);

    let mut packer = AtlasPacker::new(cfg);
    for order in RectOrder::ALL {
        let mut fastest = Duration::MAX;
        let mut result = PackResult::default();
        for _ in 0..runs {
            let start = Instant::now();
            result = packer.pack_rects(&rects, order);
            fastest = fastest.min(start.elapsed());
        }
        println!(
            "order={:<18} atlases={} not_packed={} fill={:.2}% time={}",
            order.as_str(),
            result.atlases.len(),
            result.not_packed.len(),
            result.average_fill_ratio() * 100.0,
            fmt_dur(fastest)
        );
    }
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

/// One entry of a rect list file.
#[derive(Debug, Deserialize)]
struct RectEntry {
    id: String,
    width: i32,
    height: i32,
}

fn load_rects(input: &InputArgs, show_progress: bool) -> anyhow::Result<Vec<AtlasRect>> {
    if input.input.is_file() && is_rect_list(&input.input) {
        return read_rect_list(&input.input);
    }
    let paths = gather_paths(&input.input, &input.include, &input.exclude)?;
    if paths.is_empty() {
        warn!(input = ?input.input, "no images found");
    }
    load_image_sizes_with_progress(&paths, show_progress)
}

fn is_rect_list(p: &Path) -> bool {
    matches!(extension(p).as_deref(), Some("json" | "yaml" | "yml"))
}

fn read_rect_list(path: &Path) -> anyhow::Result<Vec<AtlasRect>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let entries: Vec<RectEntry> = match extension(path).as_deref() {
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("parse {}", path.display()))?,
        _ => serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?,
    };
    Ok(entries
        .into_iter()
        .map(|e| AtlasRect::new(e.id, e.width, e.height))
        .collect())
}

fn extension(p: &Path) -> Option<String> {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

fn gather_paths(path: &Path, include: &[String], exclude: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if exclude.is_some_and(|ex| ex.is_match(&s)) {
        return true;
    }
    include.is_some_and(|inc| !inc.is_match(&s))
}

fn is_image(p: &Path) -> bool {
    matches!(
        extension(p).as_deref(),
        Some("png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

fn load_image_sizes_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<AtlasRect>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        if let Some(b) = &bar {
            let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
            b.set_message(msg.to_string());
        }
        match image::image_dimensions(p) {
            Ok((w, h)) => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push(AtlasRect::new(key, clamp_dim(w), clamp_dim(h)));
            }
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn clamp_dim(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(serde::Serialize)]
struct MergedConfig<'a> {
    #[serde(flatten)]
    cfg: &'a PackerConfig,
    order: &'a str,
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    padding: Option<u32>,
    max_size: Option<u32>,
    parallel: Option<bool>,
    order: Option<String>,
}

impl YamlConfig {
    fn apply(self, cfg: &mut PackerConfig, order: OrderChoice) -> anyhow::Result<OrderChoice> {
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.max_size {
            cfg.max_size = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        match self.order {
            Some(s) => parse_order(&s),
            None => Ok(order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_names_and_best() {
        assert_eq!(parse_order("best").unwrap(), OrderChoice::Best);
        assert_eq!(
            parse_order("area_then_width").unwrap(),
            OrderChoice::Fixed(RectOrder::AreaThenWidth)
        );
        assert!(parse_order("diagonal").is_err());
    }

    #[test]
    fn yaml_overrides_cli_values() {
        let y: YamlConfig = serde_yaml::from_str("max_size: 512\norder: wth\n").unwrap();
        let mut cfg = PackerConfig::default();
        let order = y.apply(&mut cfg, OrderChoice::Best).unwrap();
        assert_eq!(cfg.max_size, 512);
        assert_eq!(cfg.padding, 2);
        assert_eq!(order, OrderChoice::Fixed(RectOrder::WidthThenHeight));
    }

    #[test]
    fn globs_filter_paths() {
        let inc = build_globset(&["**/*.png".to_string()]).unwrap();
        let exc = build_globset(&["**/skip/**".to_string()]).unwrap();
        assert!(!should_skip(Path::new("a/b.png"), inc.as_ref(), exc.as_ref()));
        assert!(should_skip(Path::new("a/b.jpg"), inc.as_ref(), exc.as_ref()));
        assert!(should_skip(Path::new("a/skip/c.png"), inc.as_ref(), exc.as_ref()));
        assert!(!should_skip(Path::new("x.gif"), None, None));
    }

    #[test]
    fn rect_list_extensions() {
        assert!(is_rect_list(Path::new("rects.JSON")));
        assert!(is_rect_list(Path::new("rects.yml")));
        assert!(!is_rect_list(Path::new("sprite.png")));
        assert!(is_image(Path::new("sprite.PNG")));
    }

    #[test]
    fn export_shapes() {
        let cfg = PackerConfig::builder().padding(0).max_size(64).build();
        let rects = vec![AtlasRect::new("a".to_string(), 8, 8), AtlasRect::new("b".to_string(), 100, 1)];
        let best = pack_with_best_order(&rects, &cfg);
        let meta = ExportMeta::from_best(&cfg, &best);

        let arr = export::to_json_array(&best.result, &meta);
        assert_eq!(arr["atlases"][0]["width"], 8);
        assert_eq!(arr["atlases"][0]["rects"][0]["id"], "a");
        assert_eq!(arr["notPacked"][0]["id"], "b");
        assert_eq!(arr["meta"]["maxSize"], 64);

        let hash = export::to_json_hash(&best.result, &meta);
        assert_eq!(hash["frames"]["a"]["frame"]["w"], 8);
        assert_eq!(hash["frames"]["a"]["atlas"], 0);
    }
}
