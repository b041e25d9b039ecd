//! Replacer CLI - render templates from the command line

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use replacer::{FixSuggestion, ReplacementMap, Replacer, ReplacerConfig, ReplacerError};

#[derive(Parser)]
#[command(name = "replacer")]
#[command(about = "Placeholder substitution with pluggable processors")]
#[command(version)]
struct Cli {
    /// YAML config file (processor defaults, cache)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render templates, one result per line (reads stdin if none given)
    Render {
        /// Templates to render
        templates: Vec<String>,

        /// JSON or YAML file with name/value pairs
        #[arg(long)]
        vars: Option<PathBuf>,

        /// Inline value, NAME=VALUE (repeatable, overrides --vars)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// List the tags found in a template
    Parse {
        template: String,
    },

    /// List available processors
    Processors,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ReplacerError> {
    let config = match &cli.config {
        Some(path) => ReplacerConfig::load(path)?,
        None => ReplacerConfig::default(),
    };
    let engine = Replacer::with_config(&config);

    match cli.command {
        Commands::Render {
            templates,
            vars,
            set,
        } => render(&engine, templates, vars.as_deref(), &set),
        Commands::Parse { template } => {
            parse(&engine, &template);
            Ok(())
        }
        Commands::Processors => {
            for name in engine.registry().names() {
                println!("{}", name.cyan());
            }
            Ok(())
        }
    }
}

fn render(
    engine: &Replacer,
    templates: Vec<String>,
    vars: Option<&Path>,
    set: &[String],
) -> Result<(), ReplacerError> {
    let mut replacements = match vars {
        Some(path) => load_vars(path)?,
        None => ReplacementMap::new(),
    };
    for assignment in set {
        let (name, value) = assignment
            .split_once('=')
            .filter(|(name, _)| !name.trim().is_empty())
            .ok_or_else(|| ReplacerError::InvalidAssignment(assignment.clone()))?;
        replacements.insert(name.trim(), value);
    }

    let templates = if templates.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        let trimmed = input.trim_end_matches(['\r', '\n']).len();
        input.truncate(trimmed);
        vec![input]
    } else {
        templates
    };

    for rendered in engine.replace_all(&templates, &replacements) {
        println!("{rendered}");
    }
    Ok(())
}

fn load_vars(path: &Path) -> Result<ReplacementMap, ReplacerError> {
    let text = fs::read_to_string(path).map_err(|source| ReplacerError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let value: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&text)?
    } else {
        serde_json::from_str(&text)?
    };
    ReplacementMap::from_json(value)
}

fn parse(engine: &Replacer, template: &str) {
    let tags = engine.tags(template);
    if tags.is_empty() {
        println!("{} no tags", "→".cyan());
        return;
    }
    println!("{} {} tags", "→".cyan(), tags.len());
    for tag in tags.iter() {
        let mut line = format!("  {} {}", tag.raw.dimmed(), tag.name.bold());
        if let Some(args) = &tag.args {
            line.push_str(&format!(" args=[{}]", args.join(", ")));
        }
        if let Some(processor) = &tag.processor {
            line.push_str(&format!(" | {}", processor.green()));
            if let Some(args) = &tag.processor_args {
                line.push_str(&format!(" args=[{}]", args.join(", ")));
            }
        }
        println!("{line}");
    }
}
