// src/extractors/text.rs
//! Turns filing HTML into the line sequence the section extractor scans.

use scraper::{node::Node, Html};

// Elements whose text never renders on the page.
const INVISIBLE_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Visible text of one filing: trimmed, non-empty lines in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filing {
    lines: Vec<String>,
}

impl Filing {
    /// Builds a filing from already-split lines, trimming them and dropping empties.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let lines = lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { lines }
    }

    /// Splits plain text on line breaks, then trims and drops empty lines.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split(is_line_break).map(str::to_string))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Linearizes an HTML document: every text node becomes its own line.
pub fn linearize_html(html: &str) -> Filing {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len() / 2);

    for node in document.root_element().descendants() {
        let Node::Text(text_node) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name().to_ascii_lowercase()))
            .is_some_and(|name| INVISIBLE_ELEMENTS.contains(&name.as_str()));
        if hidden {
            continue;
        }

        text.push_str(&text_node.text);
        text.push('\n');
    }

    let filing = Filing::from_text(&text);
    tracing::debug!("Linearized {} bytes of HTML into {} lines", html.len(), filing.len());
    filing
}
