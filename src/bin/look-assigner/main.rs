//! look-assigner CLI - publish looks and assign them onto scenes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use look_assigner::library::{load_template, project_root, scan_shader_files, template_path, LOOK_FILE_EXTENSION};
use look_assigner::prelude::*;
use look_assigner::session::AssignSummary;

/// Exit status for validation warnings (nothing was changed).
const EXIT_WARNING: u8 = 2;

#[derive(Parser)]
#[command(name = "look-assigner", author, version, about, long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Preferences file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp pipeline data on a scene's materials and export them as a look file
    Publish {
        /// Dressed scene document
        scene: PathBuf,
        /// Output look file
        #[arg(short, long)]
        out: PathBuf,
        /// Also write the stamped metadata back into the scene
        #[arg(long)]
        write_scene: bool,
    },
    /// Assign shaders from a look file onto a scene
    Assign(AssignArgs),
    /// List the materials in a look file
    List {
        /// Look file
        library: PathBuf,
        /// Ignore the material filters
        #[arg(long)]
        bypass_filters: bool,
    },
    /// Find look files under a folder or every configured search path
    Scan {
        /// Folder to search
        dir: Option<PathBuf>,
        /// Look file extension
        #[arg(long, default_value = LOOK_FILE_EXTENSION)]
        ext: String,
    },
    /// Remove materials no object uses
    Purge {
        /// Scene document
        scene: PathBuf,
        /// Output scene (defaults to overwriting the input)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show configured search paths
    Paths {
        /// Merge a path template file (defaults to the project template)
        #[arg(long)]
        template: Option<PathBuf>,
        /// Save merged paths to the preferences file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct AssignArgs {
    /// Look file
    library: PathBuf,
    /// Scene document
    scene: PathBuf,
    /// Shader to assign (repeatable)
    #[arg(short, long = "shader")]
    shaders: Vec<String>,
    /// Use every material that passes the filters
    #[arg(long, conflicts_with = "shaders")]
    all: bool,
    /// Ignore the material filters with --all
    #[arg(long, requires = "all")]
    bypass_filters: bool,
    /// Put the single shader on every mesh, ignoring pipeline data
    #[arg(long)]
    force: bool,
    /// Only assign to selected objects
    #[arg(long)]
    selected: bool,
    /// Output scene (defaults to overwriting the input)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let prefs = match load_preferences(cli.config.as_deref()) {
        Ok(prefs) => prefs,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose || prefs.debug_mode, cli.quiet);

    match run(cli, prefs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<Error>() {
            Some(err) if err.is_warning() => {
                eprintln!("Warning: {}", err);
                ExitCode::from(EXIT_WARNING)
            }
            _ => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_env("LOOK_ASSIGNER_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_preferences(path: Option<&Path>) -> Result<Preferences> {
    match path {
        Some(path) => Preferences::load_from(path)
            .with_context(|| format!("failed to load preferences from {}", path.display())),
        None => Ok(Preferences::load()),
    }
}

fn run(cli: Cli, prefs: Preferences) -> Result<()> {
    match cli.command {
        Commands::Publish { scene, out, write_scene } => cmd_publish(prefs, &scene, &out, write_scene),
        Commands::Assign(args) => cmd_assign(prefs, args),
        Commands::List { library, bypass_filters } => cmd_list(prefs, &library, bypass_filters),
        Commands::Scan { dir, ext } => cmd_scan(&prefs, dir.as_deref(), &ext),
        Commands::Purge { scene, out } => cmd_purge(&scene, out.as_deref()),
        Commands::Paths { template, save } => cmd_paths(prefs, cli.config.as_deref(), template, save),
    }
}

fn open_scene(path: &Path) -> Result<SceneDocument> {
    SceneDocument::load(path).with_context(|| format!("failed to open scene {}", path.display()))
}

fn open_library(path: &Path) -> Result<ShaderLibrary> {
    ShaderLibrary::load(path).with_context(|| format!("failed to open look file {}", path.display()))
}

fn cmd_publish(prefs: Preferences, scene_path: &Path, out: &Path, write_scene: bool) -> Result<()> {
    let mut scene = open_scene(scene_path)?;
    let mut session = LookSession::new(prefs, TracingSink);
    let outcome = session.publish(&mut scene);

    outcome.library.save(out)?;
    info!("Wrote {} shaders to {}", outcome.library.materials.len(), out.display());

    for (material, objects) in outcome.usage.iter() {
        println!("{:<32} {}", material, objects.join(", "));
    }

    if write_scene {
        scene.save(scene_path)?;
        debug!("Updated scene {}", scene_path.display());
    }
    Ok(())
}

fn cmd_assign(prefs: Preferences, args: AssignArgs) -> Result<()> {
    let library = open_library(&args.library)?;
    let mut scene = open_scene(&args.scene)?;
    let mut session = LookSession::new(prefs, TracingSink);

    let shaders = if args.all {
        session.list_materials(&library, args.bypass_filters)
    } else {
        args.shaders
    };
    let request = AssignRequest {
        shaders,
        force: args.force,
        selected_only: args.selected,
    };

    let summary = session.assign(&mut scene, &library, &request)?;
    print_summary(&summary);

    let out = args.out.as_deref().unwrap_or(&args.scene);
    scene.save(out)?;
    info!("Wrote scene {}", out.display());
    Ok(())
}

fn print_summary(summary: &AssignSummary) {
    println!("Shaders imported:   {}", summary.imported.len());
    if !summary.missing.is_empty() {
        println!("Shaders missing:    {}", summary.missing.join(", "));
    }
    println!("Objects in pool:    {}", summary.pool_size);
    println!("Objects assigned:   {}", summary.assigned_objects);
    println!("Unresolved targets: {}", summary.unresolved_targets);
    if !summary.standard.is_empty() {
        println!("Without pipeline data (not assigned): {}", summary.standard.join(", "));
    }
}

fn cmd_list(prefs: Preferences, library_path: &Path, bypass_filters: bool) -> Result<()> {
    let library = open_library(library_path)?;
    let attribute = prefs.pipeline_attribute_name.clone();
    let mut session = LookSession::new(prefs, TracingSink);

    for name in session.list_materials(&library, bypass_filters) {
        let pipelined = library
            .material(&name)
            .map(|m| m.is_pipelined(&attribute))
            .unwrap_or(false);
        println!("{} {}", if pipelined { "*" } else { " " }, name);
    }
    Ok(())
}

fn cmd_scan(prefs: &Preferences, dir: Option<&Path>, ext: &str) -> Result<()> {
    let roots: Vec<PathBuf> = match dir {
        Some(dir) => vec![dir.to_path_buf()],
        None => prefs.paths.iter().map(|p| p.file_path.clone()).collect(),
    };
    if roots.is_empty() {
        println!("No search paths configured. Add one with `look-assigner paths --template <file> --save`.");
        return Ok(());
    }

    for root in roots {
        let files = scan_shader_files(&root, ext)
            .with_context(|| format!("failed to scan {}", root.display()))?;
        debug!("{}: {} look files", root.display(), files.len());
        for file in files {
            println!("{}", file.display());
        }
    }
    Ok(())
}

fn cmd_purge(scene_path: &Path, out: Option<&Path>) -> Result<()> {
    let mut scene = open_scene(scene_path)?;
    let removed = scene.purge_unused_materials();
    let out = out.unwrap_or(scene_path);
    scene.save(out)?;
    println!("Removed {} unused materials.", removed);
    Ok(())
}

fn cmd_paths(mut prefs: Preferences, config: Option<&Path>, template: Option<PathBuf>, save: bool) -> Result<()> {
    let template = template.or_else(|| project_root().map(|root| template_path(&root)));
    if let Some(template) = template {
        let added = load_template(&mut prefs, &template)
            .with_context(|| format!("failed to read path template {}", template.display()))?;
        debug!("Added {} paths from template {}", added, template.display());
    }

    for path in &prefs.paths {
        let marker = if path.from_template { "template" } else { "user" };
        println!("{:<20} {:<8} {}", path.name, marker, path.file_path.display());
    }

    if save {
        match config {
            Some(config) => prefs.save_to(config)?,
            None => prefs.save()?,
        }
    }
    Ok(())
}
