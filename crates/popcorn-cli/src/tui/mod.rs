//! Interactive terminal UI.

mod app;
mod render;
mod title;

use crate::commands::Context;
use app::App;
use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use popcorn_core::TitleSink;
use ratatui::DefaultTerminal;
use std::sync::Arc;
use title::TerminalTitle;
use tracing::info;

pub async fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_validated_config()?;
    let title: Arc<dyn TitleSink> = Arc::new(TerminalTitle);
    let session = ctx.session_with_title(&config, Arc::clone(&title))?;
    let mut app = App::new(session);

    info!(
        log_file = %ctx.paths.tui_log_file().display(),
        policy = ?config.detail.reselect_policy,
        "Starting TUI"
    );
    title.set_title(&config.ui.default_title);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app).await;
    ratatui::restore();

    info!("TUI closed");
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    let mut search_rx = app.session().subscribe_search();
    let mut detail_rx = app.session().subscribe_detail();

    while !app.should_quit() {
        terminal.draw(|frame| render::draw(frame, app))?;

        tokio::select! {
            event = events.next() => match event {
                // Windows reports releases too
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Ok(()) = search_rx.changed() => app.on_search_changed(),
            Ok(()) = detail_rx.changed() => app.on_detail_changed(),
        }
    }

    Ok(())
}
