//! Page context for chat requests
//!
//! The form wizard exposes the current page's answers as a flat
//! field -> value mapping. The chat pipeline treats it as an opaque
//! blob: it is rendered into the outbound message text and never parsed
//! back.

/// Flat snapshot of the active form page's answers.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    fields: Vec<(String, String)>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.push((field.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn render(&self) -> String {
        self.fields
            .iter()
            .map(|(field, value)| format!("{}: {}", field, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compose the outbound message body: the bare question, or the
/// question framed together with the page context blob.
pub fn compose_message(question: &str, context: Option<&PageContext>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => format!(
            "User's Question: {}\n\n--- Page Context ---\n\n{}",
            question,
            ctx.render()
        ),
        _ => question.to_string(),
    }
}
