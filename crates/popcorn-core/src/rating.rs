/// Star rating input, 1..=max.
///
/// Hovering previews a value without committing it; `display` shows the
/// preview while there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct StarRating {
    max_rating: u8,
    rating: u8,
    hover: u8,
    messages: Vec<String>,
}

impl StarRating {
    pub fn new(max_rating: u8) -> Self {
        Self {
            max_rating: max_rating.max(1),
            rating: 0,
            hover: 0,
            messages: Vec::new(),
        }
    }

    pub fn with_default_rating(mut self, rating: u8) -> Self {
        if rating <= self.max_rating {
            self.rating = rating;
        }
        self
    }

    /// One label per star (e.g. "Terrible" .. "Amazing"). Ignored unless
    /// there is exactly one message per star.
    pub fn with_messages<I, M>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_rating(&self) -> u8 {
        self.max_rating
    }

    /// Committed rating, 0 when nothing was chosen yet.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn hover(&mut self, stars: u8) {
        self.hover = stars.min(self.max_rating);
    }

    pub fn leave(&mut self) {
        self.hover = 0;
    }

    /// Commit `stars`. Out-of-range values are ignored. Returns whether the
    /// committed rating changed.
    pub fn commit(&mut self, stars: u8) -> bool {
        if stars == 0 || stars > self.max_rating || stars == self.rating {
            return false;
        }
        self.rating = stars;
        true
    }

    /// Move the hover preview by `delta`, starting from the committed value.
    pub fn step_hover(&mut self, delta: i8) {
        let base = if self.hover > 0 { self.hover } else { self.rating };
        let next = (i16::from(base) + i16::from(delta)).clamp(1, i16::from(self.max_rating));
        self.hover = next as u8;
    }

    /// Commit whatever is being previewed.
    pub fn commit_hover(&mut self) -> bool {
        let hover = self.hover;
        self.leave();
        self.commit(hover)
    }

    pub fn display(&self) -> u8 {
        if self.hover > 0 {
            self.hover
        } else {
            self.rating
        }
    }

    pub fn label(&self) -> String {
        let shown = self.display();
        if shown == 0 {
            return String::new();
        }
        if self.messages.len() == usize::from(self.max_rating) {
            return self.messages[usize::from(shown) - 1].clone();
        }
        shown.to_string()
    }

    /// `★★★☆☆` style rendering of `display()`.
    pub fn stars(&self) -> String {
        let filled = usize::from(self.display());
        let empty = usize::from(self.max_rating) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }

    pub fn reset(&mut self) {
        self.rating = 0;
        self.hover = 0;
    }
}

impl Default for StarRating {
    fn default() -> Self {
        Self::new(5)
    }
}
