//! Layout Presets CLI
//!
//! Inspect, import and preview stored plot layout presets.

use anyhow::{Context, Result};
use clap::Parser;
use layout_presets::cli::import::ImportArgs;
use layout_presets::cli::{Cli, Command};
use layout_presets::config::{ConfigLoader, ConfigPaths};
use layout_presets::format::{OutputFormat, format_layout, format_layout_list_markdown, format_value};
use layout_presets::logging::{self, LogOutput};
use layout_presets::merge::MergeEvent;
use layout_presets::presets::LayoutManager;
use layout_presets::resolver;
use layout_presets::store::parse_collection;
use layout_presets::target::memory::{MemoryAxes, MemoryFigure, MemoryNode};
use layout_presets::LayoutCollection;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(logging::level_for(cli.verbose), &LogOutput::parse(&cli.log))?;

    // Explicit config file is picked up by the loader through the environment.
    // SAFETY: set at startup before any other threads are spawned.
    if let Some(config_path) = &cli.config {
        unsafe {
            std::env::set_var("LAYOUT_PRESETS_CONFIG_PATH", config_path);
        }
    }
    let mut loader = ConfigLoader::load()?;
    if let Some(path) = loader.config_path() {
        debug!(path = %path.display(), "using config file");
    }

    if let Some(store) = &cli.store {
        loader.config_mut().store.path = Some(store.clone());
    }

    let paths = loader.paths.clone();
    let config = loader.into_config();
    let manager = LayoutManager::from_config(&config, &paths);

    match cli.command {
        Command::List => run_list(&manager),
        Command::Show { name, format } => run_show(&manager, name.as_deref(), format.into()),
        Command::Default { format } => {
            println!("{}", format_layout(&manager.default_layout(), format.into()));
            Ok(())
        }
        Command::Path => run_path(&manager, &paths),
        Command::Import(args) => run_import(&manager, &args),
        Command::Preview { name, axes, lines } => {
            run_preview(&manager, name.as_deref(), axes, lines)
        }
    }
}

fn run_list(manager: &LayoutManager) -> Result<()> {
    print!("{}", format_layout_list_markdown(&manager.load_layouts()));
    Ok(())
}

fn run_show(manager: &LayoutManager, name: Option<&str>, format: OutputFormat) -> Result<()> {
    let resolution = resolver::resolve(name, &manager.load_layouts());
    if resolution.is_fallback() {
        eprintln!("Warning: {}", resolution.origin);
    }
    println!("{}", format_layout(&resolution.layout, format));
    Ok(())
}

fn run_path(manager: &LayoutManager, paths: &ConfigPaths) -> Result<()> {
    let location = manager.store().location();
    println!("store:   {}", manager.store().path().display());
    println!("local:   {}", location.local.display());
    match &location.user {
        Some(user) => println!("user:    {}", user.display()),
        None => println!("user:    (none)"),
    }
    if let Some(user_dir) = &paths.user_dir {
        println!("config:  {}", user_dir.display());
    }
    println!("profile: {}", manager.profile());
    Ok(())
}

fn run_import(manager: &LayoutManager, args: &ImportArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let incoming = parse_collection(&content)
        .with_context(|| format!("cannot parse layouts in {}", args.file.display()))?;

    let selected: LayoutCollection = incoming
        .into_iter()
        .filter(|layout| args.selects(&layout.name))
        .collect::<Vec<_>>()
        .into();

    let existing = manager.load_layouts();
    for layout in &selected {
        let action = if existing.find(&layout.name).is_some() {
            "replace"
        } else {
            "add"
        };
        println!("{:<8} {}", action, layout.name);
    }

    if args.dry_run {
        println!("Dry run: {} layout(s) not written.", selected.len());
        return Ok(());
    }

    let count = selected.len();
    let path = manager.import(selected)?;
    info!(count, path = %path.display(), "imported layouts");
    println!("Imported {} layout(s) into {}", count, path.display());
    Ok(())
}

fn run_preview(manager: &LayoutManager, name: Option<&str>, axes: usize, lines: usize) -> Result<()> {
    let mut figure = MemoryFigure::new(MemoryNode::new());
    for _ in 0..axes {
        let mut node = MemoryAxes::new(MemoryNode::new());
        for _ in 0..lines {
            node = node.with_line(MemoryNode::new());
        }
        figure = figure.with_axes(node);
    }

    let mut writes = Vec::new();
    let report = manager.apply_layout_with(name, &mut figure, &mut |group, event| {
        if let MergeEvent::Written { path, value } = event {
            writes.push(format!("{:<7} {} = {}", group, path, format_value(value)));
        }
    })?;

    println!("Layout: {} ({})", report.layout_name, report.origin);
    for line in &writes {
        println!("  {}", line);
    }
    let total = report.total();
    println!(
        "{} written, {} unchanged, {} failed",
        total.written, total.unchanged, total.failed
    );
    Ok(())
}
