//! Transcript export
//!
//! Renders a conversation into a standalone HTML document for saving or
//! printing. Literal turns are escaped verbatim with newlines kept as
//! line breaks; markup-flagged turns go through the markdown renderer.

use std::io;
use std::path::Path;

use chrono::Local;
use ssassist_protocol::{Sender, Turn};

use crate::markdown;

/// Render the conversation to a self-contained HTML page.
pub fn render_transcript(turns: &[Turn]) -> String {
    let mut body = String::new();
    for turn in turns {
        let class = match turn.sender {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        };
        let label = match turn.sender {
            Sender::User => "You",
            Sender::Assistant => "SSAssist",
        };
        let content = if turn.render_as_markup {
            markdown::render(&turn.text)
        } else {
            escape_html(&turn.text).replace('\n', "<br>")
        };
        body.push_str(&format!(
            "    <div class=\"message {class}\">\n      <div class=\"label\">{label}</div>\n      <div class=\"bubble\">{content}</div>\n    </div>\n"
        ));
    }

    let exported_at = Local::now().format("%Y-%m-%d %H:%M");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>SSAssist Chat Conversation</title>
  <style>
    body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}
    .meta {{ color: #666; font-size: 0.85rem; margin-bottom: 1.5rem; }}
    .message {{ margin: 0.75rem 0; }}
    .label {{ font-weight: bold; font-size: 0.85rem; margin-bottom: 0.2rem; }}
    .bubble {{ padding: 0.6rem 0.9rem; border-radius: 0.5rem; }}
    .user .bubble {{ background: #e8f0fe; }}
    .assistant .bubble {{ background: #f1f3f4; }}
  </style>
</head>
<body>
  <h1>SSAssist Chat Conversation</h1>
  <div class="meta">Exported {exported_at}</div>
  <div class="conversation">
{body}  </div>
</body>
</html>
"#
    )
}

/// Render the conversation and write it to `path`.
pub fn write_transcript(turns: &[Turn], path: &Path) -> io::Result<()> {
    std::fs::write(path, render_transcript(turns))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
