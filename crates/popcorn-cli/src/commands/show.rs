use crate::commands::Context;
use crate::output::Output;
use crate::progress::Spinner;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::Session;
use popcorn_models::MovieDetail;

pub async fn run_show(ctx: &Context, imdb_id: &str, output: &Output) -> Result<()> {
    let config = ctx.load_validated_config()?;
    let mut session = ctx.session(&config)?;

    let detail = load_detail(&mut session, imdb_id, output).await?;
    output.detail(&detail, session.watched_user_rating(imdb_id));
    Ok(())
}

/// Open `imdb_id` in the session and wait for its detail.
pub async fn load_detail(session: &mut Session, imdb_id: &str, output: &Output) -> Result<MovieDetail> {
    let spinner = Spinner::start(format!("Loading {}...", imdb_id), output.is_human());
    session.select_movie(imdb_id);
    session.wait_for_detail().await;
    spinner.finish();

    let state = session.detail_state();
    if let Some(message) = state.error {
        return Err(eyre!("{}", message));
    }
    state
        .current()
        .cloned()
        .ok_or_else(|| eyre!("No details for {}", imdb_id))
}
