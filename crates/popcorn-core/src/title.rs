use std::sync::{Arc, Mutex};

/// Something that shows a window or tab title.
pub trait TitleSink: Send + Sync {
    fn set_title(&self, title: &str);
}

/// Ignores every title.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTitle;

impl TitleSink for NoopTitle {
    fn set_title(&self, _title: &str) {}
}

/// Keeps every title it was given, newest last.
#[derive(Debug, Default)]
pub struct RecordingTitle {
    history: Mutex<Vec<String>>,
}

impl RecordingTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn current(&self) -> Option<String> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl TitleSink for RecordingTitle {
    fn set_title(&self, title: &str) {
        if let Ok(mut history) = self.history.lock() {
            history.push(title.to_string());
        }
    }
}

/// Shows `Movie | <title>` until dropped, then puts the default title back.
pub struct ScopedTitle {
    sink: Arc<dyn TitleSink>,
    default_title: String,
    movie_title: String,
}

impl ScopedTitle {
    pub fn new(sink: Arc<dyn TitleSink>, default_title: impl Into<String>, movie_title: impl Into<String>) -> Self {
        let movie_title = movie_title.into();
        sink.set_title(&format!("Movie | {}", movie_title));
        Self {
            sink,
            default_title: default_title.into(),
            movie_title,
        }
    }

    pub fn movie_title(&self) -> &str {
        &self.movie_title
    }
}

impl Drop for ScopedTitle {
    fn drop(&mut self) {
        self.sink.set_title(&self.default_title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_title_restores_on_drop() {
        let sink = Arc::new(RecordingTitle::new());
        {
            let guard = ScopedTitle::new(sink.clone(), "usePopcorn", "Heat");
            assert_eq!(guard.movie_title(), "Heat");
            assert_eq!(sink.current().as_deref(), Some("Movie | Heat"));
        }
        assert_eq!(sink.current().as_deref(), Some("usePopcorn"));
    }

    #[test]
    fn test_replacing_guard_restores_before_next_title() {
        let sink = Arc::new(RecordingTitle::new());
        let mut guard = Some(ScopedTitle::new(sink.clone(), "usePopcorn", "Heat"));

        drop(guard.take());
        guard = Some(ScopedTitle::new(sink.clone(), "usePopcorn", "Alien"));
        assert!(guard.is_some());

        assert_eq!(
            sink.history(),
            vec!["Movie | Heat", "usePopcorn", "Movie | Alien"]
        );
    }
}
