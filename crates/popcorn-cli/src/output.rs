use clap::ValueEnum;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_models::{MovieDetail, MovieSummary, WatchedEntry, WatchedSummary};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "success", "message": msg.as_ref() }));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "error", "message": msg.as_ref() }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "warning", "message": msg.as_ref() }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            OutputFormat::Human => println!("{}", data),
        }
    }

    /// Search results; `rating_for` marks the ones already on the watched list.
    pub fn movies(&self, query: &str, movies: &[MovieSummary], rating_for: impl Fn(&str) -> Option<u8>) {
        if !self.is_human() {
            let items: Vec<_> = movies
                .iter()
                .map(|m| {
                    json!({
                        "imdbID": m.imdb_id,
                        "title": m.title,
                        "year": m.year,
                        "poster": m.poster,
                        "userRating": rating_for(&m.imdb_id),
                    })
                })
                .collect();
            self.json(&json!({ "query": query, "total": movies.len(), "movies": items }));
            return;
        }
        if self.quiet {
            return;
        }

        println!("Found {} results", movies.len().to_string().bold());
        let mut table = new_table();
        table.set_header(vec![header("IMDb id"), header("Title"), header("Year"), header("Watched")]);
        for movie in movies {
            let watched = match rating_for(&movie.imdb_id) {
                Some(rating) => format!("⭐ {}", rating),
                None => String::new(),
            };
            table.add_row(vec![
                Cell::new(&movie.imdb_id).fg(Color::DarkGrey),
                Cell::new(&movie.title),
                Cell::new(format!("🗓 {}", movie.year)),
                Cell::new(watched).fg(Color::Yellow),
            ]);
        }
        println!("{}", table);
    }

    pub fn detail(&self, detail: &MovieDetail, user_rating: Option<u8>) {
        if !self.is_human() {
            let mut value = serde_json::to_value(detail).unwrap_or_default();
            if let Some(obj) = value.as_object_mut() {
                obj.insert("userRating".to_string(), json!(user_rating));
            }
            self.json(&value);
            return;
        }
        if self.quiet {
            return;
        }

        println!();
        println!("{} ({})", detail.title.bright_cyan().bold(), detail.year);
        println!("{} • {}", detail.released, detail.runtime);
        println!("{}", detail.genre.bright_black());
        match detail.imdb_rating {
            Some(rating) => println!("⭐ {} IMDb rating", rating),
            None => println!("⭐ no IMDb rating"),
        }
        println!();
        println!("{}", detail.plot.italic());
        println!();
        println!("Starring {}", detail.actors);
        println!("Directed by {}", detail.director);
        if let Some(rating) = user_rating {
            println!();
            println!("{}", format!("You rated this movie {} ⭐", rating).yellow());
        }
    }

    pub fn watched(&self, entries: &[WatchedEntry]) {
        if !self.is_human() {
            self.json(&serde_json::to_value(entries).unwrap_or_default());
            return;
        }
        if self.quiet {
            return;
        }
        if entries.is_empty() {
            println!("{}", "No watched movies yet".bright_black());
            return;
        }

        let mut table = new_table();
        table.set_header(vec![
            header("IMDb id"),
            header("Title"),
            header("⭐ IMDb"),
            header("🌟 Yours"),
            header("⏳ Runtime"),
        ]);
        for entry in entries {
            table.add_row(vec![
                Cell::new(&entry.imdb_id).fg(Color::DarkGrey),
                Cell::new(&entry.title),
                Cell::new(entry.imdb_rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())),
                Cell::new(entry.user_rating).fg(Color::Yellow),
                Cell::new(entry.runtime.map(|r| format!("{} min", r)).unwrap_or_else(|| "-".to_string())),
            ]);
        }
        println!("{}", table);
    }

    pub fn summary(&self, summary: &WatchedSummary) {
        if !self.is_human() {
            self.json(&serde_json::to_value(summary).unwrap_or_default());
            return;
        }
        if self.quiet {
            return;
        }

        let mut table = new_table();
        table.set_header(vec![Cell::new("Movies you watched")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold)]);
        table.add_row(vec![Cell::new("#️⃣ Movies"), Cell::new(summary.count)]);
        table.add_row(vec![Cell::new("⭐ IMDb rating"), Cell::new(format!("{:.2}", summary.avg_imdb_rating))]);
        table.add_row(vec![Cell::new("🌟 Your rating"), Cell::new(format!("{:.2}", summary.avg_user_rating))]);
        table.add_row(vec![Cell::new("⏳ Runtime"), Cell::new(format!("{:.0} min", summary.avg_runtime))]);
        println!("{}", table);
    }
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn header(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}
