mod config;
mod error;

use std::path::{Path, PathBuf};

use aspect::{PERMISSIONS_BOUNDARY, PermissionBoundary, PolicyReference};
use clap::{Parser, Subcommand};
use construct::{ConstructTree, doc::TreeDoc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "breakwater.toml";

#[derive(Parser)]
#[command(name = "breakwater")]
#[command(about = "Permission-boundary enforcement for construct trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file.
    #[arg(short, long, default_value = CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the permission boundary and emit the synthesized template
    Synth {
        /// Tree document to synthesize
        #[arg(short, long)]
        tree: PathBuf,
        /// Environment from config whose context is substituted into the tree
        #[arg(short, long)]
        env: Option<String>,
        /// Boundary policy ARN, overriding the config
        #[arg(short, long)]
        boundary_arn: Option<String>,
        /// Write the template here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List Role constructs and their current boundary
    Roles {
        /// Tree document to inspect
        #[arg(short, long)]
        tree: PathBuf,
        /// Environment from config whose context is substituted into the tree
        #[arg(short, long)]
        env: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Synth {
            tree,
            env,
            boundary_arn,
            output,
        } => cmd_synth(&cli.config, &tree, env.as_deref(), boundary_arn, output),
        Commands::Roles { tree, env } => cmd_roles(&cli.config, &tree, env.as_deref()),
    }
}

fn cmd_synth(
    config_path: &Path,
    tree_path: &Path,
    env: Option<&str>,
    boundary_arn: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    // The config is only required when the command line does not fully
    // specify the run (boundary given and no environment selected).
    let config = load_config(config_path, boundary_arn.is_none() || env.is_some())?;

    let boundary = match boundary_arn {
        Some(arn) => PolicyReference::arn(arn)?,
        None => config.boundary()?,
    };

    let mut tree = load_tree(tree_path, &config, env)?;
    let aspect = PermissionBoundary::new(boundary);
    let report = aspect.apply(&mut tree)?;
    info!(
        boundaries = report.boundaries_applied,
        visits = report.nodes_visited,
        "boundary applied"
    );

    let template = serde_json::to_string_pretty(&tree.synthesize())?;
    match output {
        Some(path) => {
            std::fs::write(&path, template)?;
            println!("Synthesized template written to {}", path.display());
            println!("Boundaries applied: {}", report.boundaries_applied);
        }
        None => println!("{template}"),
    }
    Ok(())
}

fn cmd_roles(config_path: &Path, tree_path: &Path, env: Option<&str>) -> Result<()> {
    let config = load_config(config_path, env.is_some())?;
    let tree = load_tree(tree_path, &config, env)?;

    let mut roles: Vec<_> = tree.roles().collect();
    if roles.is_empty() {
        println!("No roles found.");
        return Ok(());
    }
    roles.sort_by(|a, b| a.id.path().cmp(b.id.path()));

    println!("{:<48}  BOUNDARY", "ROLE");
    println!("{}", "-".repeat(70));
    for role in roles {
        let boundary = tree
            .role_template(&role.id)
            .map(|t| match t.property(PERMISSIONS_BOUNDARY) {
                Some(serde_json::Value::String(arn)) => arn.clone(),
                Some(other) => other.to_string(),
                None => "-".to_string(),
            })
            .unwrap_or_else(|| "(no template)".to_string());
        println!("{:<48}  {boundary}", role.id.path());
    }
    Ok(())
}

/// Load the config, tolerating a missing file only when it is optional.
fn load_config(path: &Path, required: bool) -> Result<Config> {
    if path.exists() {
        Ok(Config::load(path)?)
    } else if required {
        Err(Error::ConfigNotFound { path: path.to_path_buf() })
    } else {
        Ok(Config::default())
    }
}

/// Read a tree document, substituting environment context if selected.
fn load_tree(path: &Path, config: &Config, env: Option<&str>) -> Result<ConstructTree> {
    let mut text = std::fs::read_to_string(path)?;
    if let Some(name) = env {
        let env = config.env(name)?;
        text = manifest::substitute(&text, &env.vars())?;
    }
    Ok(TreeDoc::parse(&text)?.build()?)
}
