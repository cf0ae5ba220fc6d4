use super::prompts;
use crate::commands::Context;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub fn run_clear(ctx: &Context, yes: bool, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    let mut watched = ctx.watched_list(&config)?;

    if watched.is_empty() {
        output.info("Watched list is already empty");
        return Ok(());
    }

    let count = watched.len();
    if !yes && !prompts::prompt_yes_no(&format!("Remove all {} watched movies?", count), Some(false))? {
        output.info("Nothing removed");
        return Ok(());
    }

    watched
        .clear()
        .map_err(|e| eyre!("Failed to clear watched list: {}", e))?;
    output.success(format!("Removed {} movie(s) from your list", count));
    Ok(())
}
