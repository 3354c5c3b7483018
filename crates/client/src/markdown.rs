//! Markdown rendering for assistant turns
//!
//! Assistant replies arrive as markdown; turns flagged
//! `render_as_markup` are interpreted through this renderer at display
//! time (transcript export, terminal output). Literal turns never pass
//! through here.

use pulldown_cmark::{html, Parser};

/// Render markdown to display markup.
pub fn render(text: &str) -> String {
    let parser = Parser::new(text);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}
