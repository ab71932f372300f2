//! Conversation transcript for the chat surface.
//!
//! The transcript is an append-only log of (speaker, text) entries. The
//! reply engine never touches it; the hosting chat surface appends both the
//! user message and the returned reply, and seeds the role welcome message
//! when a panel opens.

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

/// One immutable line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Ordering index, strictly increasing from 0.
    pub index: usize,
}

/// Ordered, append-only message history.
///
/// Entries are never mutated or reordered after insertion.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its ordering index.
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> usize {
        let index = self.entries.len();
        self.entries.push(TranscriptEntry {
            speaker,
            text: text.into(),
            index,
        });
        index
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries, e.g. when a different role's panel opens.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Escape text for literal inclusion in an HTML fragment.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a reply template for the chat surface.
///
/// The whole template is HTML-escaped, then paired `**…**` spans become
/// `<strong>…</strong>`. No other markup is interpreted, so a template (or
/// any text routed through here) cannot inject markup. An unpaired `**`
/// renders literally.
pub fn render_emphasis(template: &str) -> String {
    let escaped = escape_html(template);
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped.as_str();
    loop {
        let Some(open) = rest.find("**") else {
            out.push_str(rest);
            break;
        };
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str("<strong>");
        out.push_str(&after_open[..close]);
        out.push_str("</strong>");
        rest = &after_open[close + 2..];
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn push_assigns_increasing_indices() {
        let mut t = Transcript::new();
        assert_eq!(t.push(Speaker::User, "hello"), 0);
        assert_eq!(t.push(Speaker::Bot, "hi there"), 1);
        assert_eq!(t.push(Speaker::User, "thanks"), 2);
        assert_eq!(t.len(), 3);
        assert_eq!(t.entries()[1].speaker, Speaker::Bot);
        assert_eq!(t.entries()[1].index, 1);
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut t = Transcript::new();
        for i in 0..10 {
            t.push(Speaker::User, format!("msg {i}"));
        }
        let indices: Vec<usize> = t.entries().iter().map(|e| e.index).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn clear_empties_the_log() {
        let mut t = Transcript::new();
        t.push(Speaker::Bot, "welcome");
        t.clear();
        assert!(t.is_empty());
        // Indices restart after a clear.
        assert_eq!(t.push(Speaker::User, "hi"), 0);
    }

    // ── render_emphasis ──────────────────────────────────────────────

    #[test]
    fn renders_paired_markers_as_strong() {
        assert_eq!(
            render_emphasis("Use the **Crop Prediction** section"),
            "Use the <strong>Crop Prediction</strong> section"
        );
    }

    #[test]
    fn renders_multiple_spans() {
        assert_eq!(
            render_emphasis("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn unpaired_marker_renders_literally() {
        assert_eq!(render_emphasis("a ** b"), "a ** b");
    }

    #[test]
    fn escapes_html_outside_and_inside_spans() {
        assert_eq!(
            render_emphasis("<script>alert(1)</script> **<b>**"),
            "&lt;script&gt;alert(1)&lt;/script&gt; <strong>&lt;b&gt;</strong>"
        );
    }

    #[test]
    fn escapes_quotes_and_ampersands() {
        assert_eq!(
            render_emphasis(r#"Tom & "Jerry"'s"#),
            "Tom &amp; &quot;Jerry&quot;&#39;s"
        );
    }
}
