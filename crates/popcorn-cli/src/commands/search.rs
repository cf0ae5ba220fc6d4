use crate::commands::Context;
use crate::output::Output;
use crate::progress::Spinner;
use color_eyre::Result;
use popcorn_core::NOT_FOUND_MESSAGE;
use tracing::info;

pub async fn run_search(ctx: &Context, query: &str, output: &Output) -> Result<()> {
    let config = ctx.load_validated_config()?;

    if query.trim().chars().count() < config.search.min_query_len {
        output.warn(format!(
            "Type at least {} characters to search",
            config.search.min_query_len
        ));
        return Ok(());
    }

    let mut session = ctx.session(&config)?;
    info!(query = %query, "Searching");

    let spinner = Spinner::start(format!("Searching for \"{}\"...", query.trim()), output.is_human());
    session.set_query(query);
    session.wait_for_search().await;
    spinner.finish();

    let state = session.search_state();
    match state.error {
        Some(message) if message == NOT_FOUND_MESSAGE => {
            output.warn(message);
            Ok(())
        }
        Some(message) => Err(color_eyre::eyre::eyre!(message)),
        None => {
            output.movies(query.trim(), &state.movies, |id| session.watched_user_rating(id));
            Ok(())
        }
    }
}
