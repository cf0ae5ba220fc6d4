use super::prompts;
use crate::commands::Context;
use crate::output::{header, new_table, Output};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use popcorn_config::{Config, API_KEY_ENV};
use serde_json::json;

pub fn run_config(ctx: &Context, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::SetKey { key } => set_key(ctx, key, output),
        ConfigCommands::Init { force } => init_config(ctx, force, output),
    }
}

fn show_config(ctx: &Context, full: bool, output: &Output) -> Result<()> {
    let config_file = ctx.config_file();
    let config = ctx.load_config()?;
    let api_key = if full {
        config.omdb.api_key.clone()
    } else {
        config.masked_api_key()
    };

    if !output.is_human() {
        let mut value = serde_json::to_value(&config).unwrap_or_default();
        value["omdb"]["api_key"] = json!(api_key);
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "exists": config_file.exists(),
            "config": value,
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Showing defaults. Run 'popcorn config init' to write them to disk.");
    }

    let mut info_table = new_table();
    info_table.set_header(vec![header("Config File"), Cell::new(config_file.display().to_string())]);
    println!("{}", info_table);

    let mut table = new_table();
    table.set_header(vec![Cell::new("Setting")
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)]);
    let key_source = if std::env::var(API_KEY_ENV).is_ok() {
        format!("{} ({})", api_key, API_KEY_ENV)
    } else {
        api_key
    };
    table.add_row(vec![Cell::new("omdb.api_key"), Cell::new(key_source)]);
    table.add_row(vec![Cell::new("omdb.base_url"), Cell::new(&config.omdb.base_url)]);
    table.add_row(vec![Cell::new("search.min_query_len"), Cell::new(config.search.min_query_len)]);
    table.add_row(vec![
        Cell::new("detail.reselect_policy"),
        Cell::new(format!("{:?}", config.detail.reselect_policy)),
    ]);
    table.add_row(vec![Cell::new("storage.watched_key"), Cell::new(&config.storage.watched_key)]);
    table.add_row(vec![Cell::new("ui.default_title"), Cell::new(&config.ui.default_title)]);
    table.add_row(vec![Cell::new("ui.max_rating"), Cell::new(config.ui.max_rating)]);
    println!("{}", table);

    if !config.is_api_key_configured() {
        println!();
        println!("{}", "No OMDb API key yet: run 'popcorn config set-key'".yellow());
    }
    Ok(())
}

fn set_key(ctx: &Context, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(k) => k,
        None => prompts::prompt_password("OMDb API key")?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    let config_file = ctx.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config.omdb.api_key = key;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("API key saved to {}", config_file.display()));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved key", API_KEY_ENV));
    }
    Ok(())
}

fn init_config(ctx: &Context, force: bool, output: &Output) -> Result<()> {
    let config_file = ctx.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
        return Ok(());
    }

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}
