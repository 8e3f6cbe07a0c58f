use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Marker delimiting emphasised text in the markup form of an insight.
pub const EMPHASIS_MARKER: &str = "**";

/// A run of insight text, optionally emphasised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub emphasis: bool,
}

/// One narrative line describing a pattern in a question's results.
///
/// Text is kept as structured spans so that interpolated survey data can never
/// be mistaken for markup or HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Is this line an item of a list introduced by the previous line?
    #[serde(default)]
    pub bullet: bool,
    pub spans: Vec<Span>,
}

impl Insight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bullet() -> Self {
        Self {
            bullet: true,
            spans: Vec::new(),
        }
    }

    /// Append plain text.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.push(text.into(), false)
    }

    /// Append emphasised text.
    pub fn strong(self, text: impl Into<String>) -> Self {
        self.push(text.into(), true)
    }

    fn push(mut self, text: String, emphasis: bool) -> Self {
        if text.is_empty() {
            return self;
        }
        match self.spans.last_mut() {
            Some(last) if last.emphasis == emphasis => last.text.push_str(&text),
            _ => self.spans.push(Span { text, emphasis }),
        }
        self
    }

    /// Parse `**`-delimited markup into spans.
    ///
    /// An unterminated marker is kept as literal text. A leading `- ` marks a
    /// bullet.
    pub fn parse_markup(markup: &str) -> Self {
        let (mut insight, body) = match markup.strip_prefix("- ") {
            Some(rest) => (Self::bullet(), rest),
            None => (Self::new(), markup),
        };

        let mut rest = body;
        let mut emphasis = false;
        while let Some(index) = rest.find(EMPHASIS_MARKER) {
            let (before, after) = rest.split_at(index);
            let after = &after[EMPHASIS_MARKER.len()..];
            if !emphasis && !after.contains(EMPHASIS_MARKER) {
                // No closing marker anywhere: the rest is literal.
                break;
            }
            insight = insight.push(before.to_string(), emphasis);
            emphasis = !emphasis;
            rest = after;
        }
        insight.push(rest.to_string(), emphasis)
    }

    /// The text with all emphasis dropped.
    #[cfg(test)]
    fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Render as an HTML fragment.
    ///
    /// All text is escaped; emphasis becomes `<strong>`. Bullets are not
    /// wrapped, so callers decide on list markup.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for span in &self.spans {
            let escaped = html_escape::encode_text(&span.text);
            if span.emphasis {
                html.push_str("<strong>");
                html.push_str(&escaped);
                html.push_str("</strong>");
            } else {
                html.push_str(&escaped);
            }
        }
        html
    }
}

/// The `**` markup form, with a `- ` prefix for bullets.
impl Display for Insight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.bullet {
            f.write_str("- ")?;
        }
        for span in &self.spans {
            if span.emphasis {
                write!(f, "{EMPHASIS_MARKER}{}{EMPHASIS_MARKER}", span.text)?;
            } else {
                f.write_str(&span.text)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_merges_neighbouring_spans() {
        let insight = Insight::new()
            .text("a")
            .text("b")
            .strong("")
            .strong("c")
            .text("d");
        assert_eq!(
            insight.spans,
            vec![
                Span { text: "ab".into(), emphasis: false },
                Span { text: "c".into(), emphasis: true },
                Span { text: "d".into(), emphasis: false },
            ]
        );
        assert_eq!(insight.to_string(), "ab**c**d");
        assert_eq!(insight.plain_text(), "abcd");
    }

    #[test]
    fn markup_parses_into_spans() {
        let insight = Insight::parse_markup("**60%** of respondents are **very** worried.");
        assert!(!insight.bullet);
        assert_eq!(
            insight,
            Insight::new()
                .strong("60%")
                .text(" of respondents are ")
                .strong("very")
                .text(" worried.")
        );
    }

    #[test]
    fn markup_bullets_and_unterminated_markers() {
        let insight = Insight::parse_markup("- **Floods** (40%)");
        assert_eq!(insight, Insight::bullet().strong("Floods").text(" (40%)"));

        let insight = Insight::parse_markup("2 ** 3 is eight");
        assert_eq!(insight, Insight::new().text("2 ** 3 is eight"));

        let insight = Insight::parse_markup("**a** and ** b");
        assert_eq!(insight, Insight::new().strong("a").text(" and ** b"));
    }

    #[test]
    fn markup_round_trips_through_display() {
        let insight = Insight::bullet().strong("Recycling").text(" (25%)");
        assert_eq!(Insight::parse_markup(&insight.to_string()), insight);
    }

    #[test]
    fn html_is_escaped() {
        let insight = Insight::new()
            .strong("<script>alert(1)</script>")
            .text(" & more");
        assert_eq!(
            insight.to_html(),
            "<strong>&lt;script&gt;alert(1)&lt;/script&gt;</strong> &amp; more"
        );
    }
}
