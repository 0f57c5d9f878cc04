use attr_splitter::api::SplitterApi;
use attr_splitter::config::{RenderDefaults, SplitterConfig, CONFIG_FILENAME};
use attr_splitter::error::Result;
use attr_splitter::model::SegmentMode;
use attr_splitter::schema::FieldKind;
use attr_splitter::store::memory::InMemoryStore;
use clap::Parser;
use console::style;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", style("Error:").for_stderr().red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Check => handle_check(&config),
        Commands::Render {
            model,
            attribute,
            jump,
            obscure,
            values,
        } => handle_render(config, &model, &attribute, jump, obscure, values),
        Commands::Combine { model, values } => handle_combine(config, &model, values),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<SplitterConfig> {
    if let Some(path) = &cli.config {
        return SplitterConfig::load_file(path);
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if cwd.join(CONFIG_FILENAME).exists() {
        return SplitterConfig::load(&cwd);
    }

    match ProjectDirs::from("com", "attr_splitter", "attr_splitter") {
        Some(dirs) => SplitterConfig::load(dirs.config_dir()),
        None => Ok(SplitterConfig::default()),
    }
}

fn handle_check(config: &SplitterConfig) -> Result<()> {
    let registry = config.registry()?;
    if registry.is_empty() {
        println!("No models configured.");
        return Ok(());
    }

    for schema in registry.iter() {
        println!("{}", style(schema.name()).bold());
        for spec in schema.splits() {
            let mode = match spec.mode() {
                SegmentMode::Prefix => "prefixes",
                SegmentMode::Suffix => "suffixes",
            };
            println!(
                "  {} ({}): {}",
                style(spec.attribute()).cyan(),
                mode,
                spec.field_names().collect::<Vec<_>>().join(", ")
            );
        }
        let plain: Vec<&str> = schema
            .fields()
            .filter(|field| schema.field_kind(field) == Some(FieldKind::Plain))
            .collect();
        if !plain.is_empty() {
            println!("  fields: {}", plain.join(", "));
        }
    }
    Ok(())
}

fn handle_render(
    config: SplitterConfig,
    model: &str,
    attribute: &str,
    jump: bool,
    obscure: bool,
    values: Vec<(String, String)>,
) -> Result<()> {
    let mut api = SplitterApi::from_config(config, InMemoryStore::new())?;
    let record = api.create(model, values)?;
    let html = api.render_declared(
        model,
        Some(record.id()),
        attribute,
        RenderDefaults {
            include_jump: jump,
            obscure_text: obscure,
        },
    )?;
    println!("{}", html);
    Ok(())
}

fn handle_combine(
    config: SplitterConfig,
    model: &str,
    values: Vec<(String, String)>,
) -> Result<()> {
    let mut api = SplitterApi::from_config(config, InMemoryStore::new())?;
    let record = api.create(model, values)?;
    println!("{}", serde_json::to_string_pretty(&record.to_stored().values)?);
    Ok(())
}
