//! Output sinks the finder renders into.
//!
//! A sink stands in for the popup's results area: it can be cleared, have
//! cards appended, show a single message in place of cards, raise a warning
//! to the user, and toggle a loading indicator.

use html_escape::{encode_double_quoted_attribute, encode_text};
use log::warn;
use std::io::Write;

use crate::model::RecipeCard;

/// Render target for one recipe finder
pub trait OutputSink {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    /// Remove everything from the output area
    fn clear(&mut self);
    fn append(&mut self, card: &RecipeCard);
    /// Show a message in the output area instead of cards
    fn show_message(&mut self, message: &str);
    /// Raise a user-facing warning outside the output area
    fn warn(&mut self, message: &str);
}

/// Plain-text rendering onto any writer, used by the CLI
pub struct TerminalSink<W: Write> {
    out: W,
    cards: usize,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, cards: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn show_loading(&mut self) {
        self.write("Searching for recipes...");
    }

    fn hide_loading(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!("Failed to flush terminal output: {}", e);
        }
    }

    fn clear(&mut self) {
        self.cards = 0;
    }

    fn append(&mut self, card: &RecipeCard) {
        self.cards += 1;
        let block = format!(
            "\n{}. {}\n   {}\n   Image: {}\n\n   Instructions:\n   {}",
            self.cards, card.title, card.link, card.image, card.instructions
        );
        self.write(&block);
    }

    fn show_message(&mut self, message: &str) {
        self.write(message);
    }

    fn warn(&mut self, message: &str) {
        self.write(&format!("Warning: {}", message));
    }
}

/// HTML fragment rendering with the popup's card markup
#[derive(Debug, Default)]
pub struct HtmlSink {
    body: String,
    loading: bool,
    warnings: Vec<String>,
}

impl HtmlSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the results container
    pub fn html(&self) -> &str {
        &self.body
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Full fragment: loading indicator plus the results container
    pub fn document(&self) -> String {
        let display = if self.loading { "block" } else { "none" };
        format!(
            "<div id=\"loading\" style=\"display: {}\">Loading...</div>\n<div id=\"recipes\">{}</div>",
            display, self.body
        )
    }
}

impl OutputSink for HtmlSink {
    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn clear(&mut self) {
        self.body.clear();
    }

    fn append(&mut self, card: &RecipeCard) {
        self.body.push_str(&card_html(card));
    }

    fn show_message(&mut self, message: &str) {
        self.body = format!("<p>{}</p>", encode_text(message));
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// Markup for one recipe card
pub fn card_html(card: &RecipeCard) -> String {
    let class = if card.details_unavailable {
        "recipe-card details-unavailable"
    } else {
        "recipe-card"
    };

    format!(
        r#"<div class="{class}">
  <div class="recipe-header">
    <h3>
      <a href="{href}" target="_blank" rel="noopener noreferrer">{title}</a>
    </h3>
    <img class="recipe-img" src="{src}" alt="{alt}" />
  </div>
  <div class="recipe-body">
    <h4>Instructions:</h4>
    <p>{instructions}</p>
  </div>
</div>
"#,
        class = class,
        href = encode_double_quoted_attribute(&card.link),
        title = encode_text(&card.title),
        src = encode_double_quoted_attribute(&card.image),
        alt = encode_double_quoted_attribute(&card.title),
        instructions = encode_text(&card.instructions),
    )
}
