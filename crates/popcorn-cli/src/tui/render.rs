use popcorn_core::{DetailState, SearchState, Session};
use popcorn_models::MovieDetail;
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Focus};

pub fn draw(frame: &mut Frame, app: &App) {
    let [nav, main, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let session = app.session();
    let search = session.search_state();
    let detail = session.detail_state();

    render_nav(frame, app, &search, nav);

    let [left, right] = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(main);
    render_results(frame, app, &search, left);
    if detail.selected.is_some() {
        render_detail(frame, session, &detail, right);
    } else {
        render_watched(frame, app, right);
    }

    render_footer(frame, app, &detail, footer);
}

fn render_nav(frame: &mut Frame, app: &App, search: &SearchState, area: Rect) {
    let [logo, input, found] = Layout::horizontal([
        Constraint::Length(16),
        Constraint::Fill(1),
        Constraint::Length(20),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new("🍿 usePopcorn")
            .style(Style::default().fg(Color::Yellow).bold())
            .block(Block::default().borders(Borders::ALL)),
        logo,
    );

    let focused = app.focus() == Focus::Search;
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let text = if search.query.is_empty() && !focused {
        Span::styled("Search movies...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(search.query.as_str())
    };
    frame.render_widget(
        Paragraph::new(Line::from(text)).block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        ),
        input,
    );
    if focused {
        frame.set_cursor_position(Position::new(
            input.x + 1 + search.query.chars().count() as u16,
            input.y + 1,
        ));
    }

    frame.render_widget(
        Paragraph::new(format!("Found {} results", search.movies.len()))
            .centered()
            .block(Block::default().borders(Borders::ALL)),
        found,
    );
}

fn toggle_title(title: &str, open: bool, key: char) -> String {
    format!(" {} [{}] {} ", title, key, if open { "–" } else { "+" })
}

fn box_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn render_results(frame: &mut Frame, app: &App, search: &SearchState, area: Rect) {
    let block = box_block(
        toggle_title("Results", app.results_open(), '['),
        app.focus() == Focus::Results,
    );
    if !app.results_open() {
        frame.render_widget(block, area);
        return;
    }

    if search.is_loading {
        frame.render_widget(Paragraph::new("Loading...").centered().block(block), area);
        return;
    }
    if let Some(error) = &search.error {
        frame.render_widget(
            Paragraph::new(format!("⛔️ {}", error))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
        return;
    }

    let session = app.session();
    let items: Vec<ListItem> = search
        .movies
        .iter()
        .map(|movie| {
            let mut spans = vec![
                Span::styled(movie.title.clone(), Style::default().bold()),
                Span::raw("  "),
                Span::styled(format!("🗓 {}", movie.year), Style::default().fg(Color::DarkGray)),
            ];
            if let Some(rating) = session.watched_user_rating(&movie.imdb_id) {
                spans.push(Span::styled(format!("  ⭐ {}", rating), Style::default().fg(Color::Yellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.result_index()));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame, session: &Session, state: &DetailState, area: Rect) {
    let block = box_block(" Movie [Esc] close ".to_string(), true);

    if let Some(error) = &state.error {
        frame.render_widget(
            Paragraph::new(format!("⛔️ {}", error))
                .style(Style::default().fg(Color::Red))
                .block(block),
            area,
        );
        return;
    }
    let Some(detail) = state.current() else {
        frame.render_widget(Paragraph::new("Loading...").centered().block(block), area);
        return;
    };

    let mut lines = detail_header(detail);
    lines.push(Line::raw(""));

    match session.watched_user_rating(&detail.imdb_id) {
        Some(rating) => lines.push(Line::styled(
            format!("You rated this movie {} ⭐", rating),
            Style::default().fg(Color::Yellow),
        )),
        None => {
            let widget = session.rating_widget();
            lines.push(Line::from(vec![
                Span::styled(widget.stars(), Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::raw(widget.label()),
            ]));
            if session.user_rating() > 0 {
                lines.push(Line::styled("[a] + Add to list", Style::default().fg(Color::Green).bold()));
            }
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(detail.plot.clone(), Style::default().italic()));
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!("Starring {}", detail.actors)));
    lines.push(Line::raw(format!("Directed by {}", detail.director)));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn detail_header(detail: &MovieDetail) -> Vec<Line<'static>> {
    let imdb = detail
        .imdb_rating
        .map(|r| format!("⭐️ {} IMDb rating", r))
        .unwrap_or_else(|| "⭐️ no IMDb rating".to_string());
    vec![
        Line::styled(detail.title.clone(), Style::default().fg(Color::Cyan).bold()),
        Line::raw(format!("{} • {}", detail.released, detail.runtime)),
        Line::styled(detail.genre.clone(), Style::default().fg(Color::DarkGray)),
        Line::raw(imdb),
    ]
}

fn render_watched(frame: &mut Frame, app: &App, area: Rect) {
    let block = box_block(
        toggle_title("Watched", app.watched_open(), ']'),
        app.focus() == Focus::Watched,
    );
    if !app.watched_open() {
        frame.render_widget(block, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [summary_area, list_area] = Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(inner);

    let session = app.session();
    let summary = session.summary();
    frame.render_widget(
        Paragraph::new(vec![
            Line::styled("MOVIES YOU WATCHED", Style::default().bold()),
            Line::raw(format!(
                "#️⃣ {} movies   ⭐️ {:.2}   🌟 {:.2}   ⏳ {:.0} min",
                summary.count, summary.avg_imdb_rating, summary.avg_user_rating, summary.avg_runtime
            )),
        ]),
        summary_area,
    );

    let items: Vec<ListItem> = session
        .watched()
        .iter()
        .map(|entry| {
            let imdb = entry.imdb_rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
            let runtime = entry.runtime.map(|r| format!("{} min", r)).unwrap_or_else(|| "-".to_string());
            ListItem::new(vec![
                Line::styled(entry.title.clone(), Style::default().bold()),
                Line::styled(
                    format!("⭐️ {}   🌟 {}   ⏳ {}", imdb, entry.user_rating, runtime),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let mut state = ListState::default();
    if !items.is_empty() && app.focus() == Focus::Watched {
        state.select(Some(app.watched_index()));
    }
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn render_footer(frame: &mut Frame, app: &App, detail: &DetailState, area: Rect) {
    if let Some(status) = app.status() {
        frame.render_widget(Paragraph::new(status.to_string()).fg(Color::Yellow).centered(), area);
        return;
    }

    let hints = match (app.focus(), detail.selected.is_some()) {
        (Focus::Search, _) => "Type to search | Tab/↓ Results | Esc Leave search | Ctrl-C Quit",
        (_, true) => "1-9,0 Rate | +/- Preview, Space Commit | a Add | Esc Close | q Quit",
        (Focus::Watched, false) => "↑↓ Navigate | d Delete | Enter Search | Tab Focus | [ ] Toggle | q Quit",
        (Focus::Results, false) => "↑↓ Navigate | →/o Open | Enter Search | Tab Focus | [ ] Toggle | q Quit",
    };
    frame.render_widget(
        Paragraph::new(hints)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        area,
    );
}
