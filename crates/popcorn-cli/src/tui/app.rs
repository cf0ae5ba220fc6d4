use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use popcorn_core::{AddOutcome, Key, KeyBinder, KeyBinding, Session};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
    Watched,
}

pub struct App {
    session: Session,
    keys: KeyBinder<App>,
    _global_keys: Vec<KeyBinding>,
    // Only bound while a movie is open
    movie_keys: Vec<KeyBinding>,
    focus: Focus,
    results_open: bool,
    watched_open: bool,
    result_index: usize,
    watched_index: usize,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let keys: KeyBinder<App> = KeyBinder::new();
        let global_keys = vec![
            keys.bind(Key::Enter, App::focus_search),
            keys.bind(Key::Tab, App::cycle_focus),
            keys.bind(Key::Up, |app| app.move_selection(-1)),
            keys.bind(Key::Down, |app| app.move_selection(1)),
            keys.bind(Key::Right, App::open_highlighted),
            keys.bind(Key::Char('o'), App::open_highlighted),
            keys.bind(Key::Char('['), |app| app.results_open = !app.results_open),
            keys.bind(Key::Char(']'), |app| app.watched_open = !app.watched_open),
            keys.bind(Key::Char('d'), App::delete_highlighted),
            keys.bind(Key::Char('q'), |app| app.should_quit = true),
        ];

        Self {
            session,
            keys,
            _global_keys: global_keys,
            movie_keys: Vec::new(),
            focus: Focus::Search,
            results_open: true,
            watched_open: true,
            result_index: 0,
            watched_index: 0,
            status: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn results_open(&self) -> bool {
        self.results_open
    }

    pub fn watched_open(&self) -> bool {
        self.watched_open
    }

    pub fn result_index(&self) -> usize {
        self.result_index
    }

    pub fn watched_index(&self) -> usize {
        self.watched_index
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // The search box takes text; Enter and Esc still reach the bindings
        if self.focus == Focus::Search {
            match event.code {
                KeyCode::Char(c) => {
                    let mut query = self.session.query();
                    query.push(c);
                    self.set_query(query);
                    return;
                }
                KeyCode::Backspace => {
                    let mut query = self.session.query();
                    query.pop();
                    self.set_query(query);
                    return;
                }
                KeyCode::Tab | KeyCode::Down => {
                    self.focus = Focus::Results;
                    return;
                }
                KeyCode::Esc => self.focus = Focus::Results,
                _ => {}
            }
        }

        let Some(key) = to_key(event.code) else {
            return;
        };
        self.status = None;
        let binder = self.keys.clone();
        let handled = binder.dispatch(key, self);
        debug!(key = %key, handled = handled, "Key dispatched");
        self.after_change();
    }

    pub fn on_search_changed(&mut self) {
        let count = self.session.search_state().movies.len();
        self.result_index = self.result_index.min(count.saturating_sub(1));
    }

    pub fn on_detail_changed(&mut self) {
        self.after_change();
    }

    fn after_change(&mut self) {
        self.session.sync_title();
        self.sync_movie_keys();
        let count = self.session.watched().len();
        self.watched_index = self.watched_index.min(count.saturating_sub(1));
    }

    fn sync_movie_keys(&mut self) {
        let open = self.session.selected_id().is_some();
        if open && self.movie_keys.is_empty() {
            let keys = &self.keys;
            let mut bindings = vec![
                keys.bind(Key::Escape, |app: &mut App| app.session.close_movie()),
                keys.bind(Key::Char('+'), |app: &mut App| app.preview_rating(1)),
                keys.bind(Key::Char('-'), |app: &mut App| app.preview_rating(-1)),
                keys.bind(Key::Char(' '), |app: &mut App| app.commit_rating_preview()),
                keys.bind(Key::Char('a'), App::add_open_movie),
            ];
            for digit in '0'..='9' {
                let stars = rating_for_digit(digit);
                bindings.push(keys.bind(Key::Char(digit), move |app: &mut App| app.rate(stars)));
            }
            self.movie_keys = bindings;
        } else if !open && !self.movie_keys.is_empty() {
            self.movie_keys.clear();
        }
    }

    fn set_query(&mut self, query: String) {
        self.session.set_query(query);
        self.result_index = 0;
    }

    /// Focus the search box and clear it, unless it already has focus.
    fn focus_search(&mut self) {
        if self.focus == Focus::Search {
            return;
        }
        self.focus = Focus::Search;
        self.set_query(String::new());
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Watched,
            Focus::Watched => Focus::Search,
        };
    }

    fn move_selection(&mut self, delta: isize) {
        let (index, len) = match self.focus {
            Focus::Search => return,
            Focus::Results => (&mut self.result_index, self.session.search_state().movies.len()),
            Focus::Watched => (&mut self.watched_index, self.session.watched().len()),
        };
        if len == 0 {
            return;
        }
        *index = index.saturating_add_signed(delta).min(len - 1);
    }

    fn open_highlighted(&mut self) {
        let id = match self.focus {
            Focus::Results => self
                .session
                .search_state()
                .movies
                .get(self.result_index)
                .map(|m| m.imdb_id.clone()),
            Focus::Watched => self.session.watched().get(self.watched_index).map(|e| e.imdb_id.clone()),
            Focus::Search => None,
        };
        if let Some(id) = id {
            self.session.select_movie(&id);
        }
    }

    fn delete_highlighted(&mut self) {
        if self.focus != Focus::Watched {
            return;
        }
        let Some(entry) = self.session.watched().get(self.watched_index).cloned() else {
            return;
        };
        match self.session.delete_watched(&entry.imdb_id) {
            Ok(_) => self.status = Some(format!("Removed {}", entry.title)),
            Err(e) => {
                error!(error = %e, imdb_id = %entry.imdb_id, "Failed to delete watched movie");
                self.status = Some(format!("Could not remove {}: {}", entry.title, e));
            }
        }
    }

    fn open_is_watched(&self) -> bool {
        self.session
            .selected_id()
            .is_some_and(|id| self.session.is_watched(&id))
    }

    fn rate(&mut self, stars: u8) {
        if !self.open_is_watched() {
            self.session.rating_widget_mut().leave();
            self.session.set_user_rating(stars);
        }
    }

    fn preview_rating(&mut self, delta: i8) {
        if !self.open_is_watched() {
            self.session.rating_widget_mut().step_hover(delta);
        }
    }

    fn commit_rating_preview(&mut self) {
        if !self.open_is_watched() {
            self.session.commit_rating_hover();
        }
    }

    fn add_open_movie(&mut self) {
        match self.session.add_watched() {
            Ok(AddOutcome::Added(entry)) => {
                self.status = Some(format!("Added {} rated {} ⭐", entry.title, entry.user_rating));
            }
            Ok(AddOutcome::AlreadyWatched(rating)) => {
                self.status = Some(format!("You rated this movie {} ⭐", rating));
            }
            Ok(AddOutcome::NotRated) => self.status = Some("Pick a rating first".to_string()),
            Ok(AddOutcome::NotLoaded) => self.status = Some("Still loading".to_string()),
            Err(e) => {
                error!(error = %e, "Failed to save watched list");
                self.status = Some(format!("Could not save: {}", e));
            }
        }
    }
}

/// `1`..`9` are that many stars, `0` is ten.
fn rating_for_digit(digit: char) -> u8 {
    match digit.to_digit(10) {
        Some(0) | None => 10,
        Some(n) => n as u8,
    }
}

pub fn to_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_config::Config;
    use async_trait::async_trait;
    use popcorn_core::{MemoryStorage, NoopTitle};
    use popcorn_models::{MovieDetail, MovieSummary};
    use popcorn_sources::{MovieDatabase, OmdbClient, SourceError};
    use std::sync::Arc;

    /// Answers every search with The Matrix and every lookup with its detail.
    struct StubDatabase;

    #[async_trait]
    impl MovieDatabase for StubDatabase {
        fn source_name(&self) -> &str {
            "stub"
        }

        async fn search(&self, _query: &str) -> Result<Vec<MovieSummary>, SourceError> {
            Ok(vec![MovieSummary {
                imdb_id: "tt0133093".to_string(),
                title: "The Matrix".to_string(),
                year: "1999".to_string(),
                poster: None,
            }])
        }

        async fn details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
            Ok(MovieDetail {
                imdb_id: imdb_id.to_string(),
                title: "The Matrix".to_string(),
                year: "1999".to_string(),
                poster: None,
                runtime: "136 min".to_string(),
                imdb_rating: Some(8.7),
                plot: String::new(),
                released: "31 Mar 1999".to_string(),
                actors: "Keanu Reeves".to_string(),
                director: "Lana Wachowski, Lilly Wachowski".to_string(),
                genre: "Action, Sci-Fi".to_string(),
            })
        }
    }

    fn create_app() -> App {
        // Nothing in these tests reaches the network
        create_app_with(Arc::new(OmdbClient::new("test-key", "http://127.0.0.1:9/")))
    }

    fn create_app_with(db: Arc<dyn MovieDatabase>) -> App {
        let session = Session::new(db, Arc::new(MemoryStorage::new()), Arc::new(NoopTitle), &Config::default());
        App::new(session)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Search for The Matrix and open it from the results box.
    async fn open_matrix(app: &mut App) {
        type_text(app, "Matrix");
        app.session.wait_for_search().await;
        app.on_search_changed();
        press(app, KeyCode::Tab);
        press(app, KeyCode::Right);
        app.session.wait_for_detail().await;
        app.on_detail_changed();
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_to_key() {
        assert_eq!(to_key(KeyCode::Esc), Some(Key::Escape));
        assert_eq!(to_key(KeyCode::Char('a')), Some(Key::Char('a')));
        assert_eq!(to_key(KeyCode::F(1)), None);
    }

    #[test]
    fn test_rating_for_digit() {
        assert_eq!(rating_for_digit('1'), 1);
        assert_eq!(rating_for_digit('9'), 9);
        assert_eq!(rating_for_digit('0'), 10);
    }

    #[tokio::test]
    async fn test_typing_edits_query() {
        let mut app = create_app();
        press(&mut app, KeyCode::Char('M'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session().query(), "Ma");
        // 'q' is text while the search box has focus
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_enter_focuses_and_clears_search() {
        let mut app = create_app();
        press(&mut app, KeyCode::Char('M'));
        press(&mut app, KeyCode::Char('a'));

        // Already focused: Enter keeps the query
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session().query(), "Ma");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Results);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus(), Focus::Search);
        assert_eq!(app.session().query(), "");
    }

    #[tokio::test]
    async fn test_box_toggles_and_quit() {
        let mut app = create_app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus(), Focus::Results);

        press(&mut app, KeyCode::Char('['));
        assert!(!app.results_open());
        press(&mut app, KeyCode::Char(']'));
        assert!(!app.watched_open());
        press(&mut app, KeyCode::Char('['));
        assert!(app.results_open());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_rating_keys_unbound_without_open_movie() {
        let mut app = create_app();
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('8'));
        assert_eq!(app.session().user_rating(), 0);
        assert!(app.movie_keys.is_empty());
    }

    #[tokio::test]
    async fn test_open_rate_and_add_through_keys() {
        let mut app = create_app_with(Arc::new(StubDatabase));
        open_matrix(&mut app).await;
        assert_eq!(app.session().selected_id().as_deref(), Some("tt0133093"));
        assert!(!app.movie_keys.is_empty());

        press(&mut app, KeyCode::Char('8'));
        assert_eq!(app.session().user_rating(), 8);
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.session().user_rating(), 10);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.session().watched().len(), 1);
        assert_eq!(app.session().watched_user_rating("tt0133093"), Some(10));
        assert_eq!(app.status(), Some("Added The Matrix rated 10 ⭐"));
        assert_eq!(app.session().selected_id(), None);
        assert!(app.movie_keys.is_empty());
    }

    #[tokio::test]
    async fn test_preview_keys_commit_rating() {
        let mut app = create_app_with(Arc::new(StubDatabase));
        open_matrix(&mut app).await;

        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.session().user_rating(), 0);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session().user_rating(), 1);
        assert_eq!(app.session().rating_decisions(), 1);
    }

    #[tokio::test]
    async fn test_escape_closes_movie_and_unbinds_keys() {
        let mut app = create_app_with(Arc::new(StubDatabase));
        open_matrix(&mut app).await;

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session().selected_id(), None);
        assert!(app.movie_keys.is_empty());

        // Digits no longer rate and 'a' no longer adds
        press(&mut app, KeyCode::Char('7'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.session().user_rating(), 0);
        assert!(app.session().watched().is_empty());
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_add_before_detail_arrives_reports_loading() {
        let mut app = create_app_with(Arc::new(StubDatabase));
        type_text(&mut app, "Matrix");
        app.session.wait_for_search().await;
        app.on_search_changed();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert!(!app.movie_keys.is_empty());

        // The detail task has not run yet on this single-threaded runtime
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.status(), Some("Still loading"));
        assert!(app.session().watched().is_empty());
    }

    #[tokio::test]
    async fn test_watched_movie_ignores_rating_keys() {
        let mut app = create_app_with(Arc::new(StubDatabase));
        open_matrix(&mut app).await;
        press(&mut app, KeyCode::Char('8'));
        press(&mut app, KeyCode::Char('a'));

        press(&mut app, KeyCode::Right);
        app.session.wait_for_detail().await;
        app.on_detail_changed();
        assert!(!app.movie_keys.is_empty());

        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.session().user_rating(), 0);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.status(), Some("You rated this movie 8 ⭐"));
        assert_eq!(app.session().watched().len(), 1);
    }

    #[test]
    fn test_ctrl_c_quits_from_search() {
        let mut app = create_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
