use super::prompts;
use crate::commands::show::load_detail;
use crate::commands::Context;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::AddOutcome;
use serde_json::json;

pub async fn run_add(ctx: &Context, imdb_id: &str, rating: Option<u8>, yes: bool, output: &Output) -> Result<()> {
    let config = ctx.load_validated_config()?;
    let mut session = ctx.session(&config)?;

    if let Some(existing) = session.watched_user_rating(imdb_id) {
        output.warn(format!("Already on your list, rated {} ⭐", existing));
        return Ok(());
    }

    let detail = load_detail(&mut session, imdb_id, output).await?;
    output.detail(&detail, None);

    let max_rating = config.ui.max_rating;
    let rating = match rating {
        Some(r) if (1..=max_rating).contains(&r) => r,
        Some(r) => return Err(eyre!("Rating {} is out of range (1-{})", r, max_rating)),
        None => prompts::prompt_rating(max_rating, output)?,
    };
    session.set_user_rating(rating);

    if !yes && !prompts::prompt_yes_no(&format!("Add \"{}\" rated {} ⭐?", detail.title, rating), Some(true))? {
        output.info("Nothing added");
        return Ok(());
    }

    match session.add_watched().map_err(|e| eyre!("Failed to save watched list: {}", e))? {
        AddOutcome::Added(entry) => {
            if output.is_human() {
                output.success(format!("Added {} ({}) rated {} ⭐", entry.title, entry.year, entry.user_rating));
            } else {
                output.json(&json!({ "type": "added", "entry": entry }));
            }
        }
        AddOutcome::AlreadyWatched(existing) => {
            output.warn(format!("Already on your list, rated {} ⭐", existing));
        }
        AddOutcome::NotRated => return Err(eyre!("A rating is required")),
        AddOutcome::NotLoaded => return Err(eyre!("No details for {}", imdb_id)),
    }
    Ok(())
}

pub fn run_remove(ctx: &Context, imdb_id: &str, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    let mut watched = ctx.watched_list(&config)?;

    let title = watched.get(imdb_id).map(|e| e.title.clone());
    let removed = watched
        .remove(imdb_id)
        .map_err(|e| eyre!("Failed to save watched list: {}", e))?;

    match title.filter(|_| removed) {
        Some(title) => output.success(format!("Removed {} from your list", title)),
        None => output.warn(format!("{} is not on your list", imdb_id)),
    }
    Ok(())
}

pub fn run_list(ctx: &Context, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    let watched = ctx.watched_list(&config)?;
    output.watched(watched.entries());
    Ok(())
}

pub fn run_summary(ctx: &Context, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    let watched = ctx.watched_list(&config)?;
    output.summary(&watched.summary());
    Ok(())
}
