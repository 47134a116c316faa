//! Height estimate for markdown comments drawn above statements

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::config::LayoutMetrics;

/// Vertical space a comment takes, zero when it is blank
///
/// Counts rendered lines: every paragraph or list item line, every code
/// block line, and headings at the taller heading line height.
pub fn comment_height(text: &str, metrics: &LayoutMetrics) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let mut lines = LineCounter::new(metrics);
    let mut in_code_block = false;
    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Heading { .. }) => lines.heading = true,
            Event::End(TagEnd::Heading(_)) => {
                lines.close();
                lines.heading = false;
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(code) if in_code_block => lines.add_plain(code.lines().count()),
            Event::Text(_) | Event::Code(_) | Event::InlineHtml(_) | Event::Html(_) => {
                lines.open = true;
            }
            Event::SoftBreak | Event::HardBreak => lines.close(),
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Item) => lines.close(),
            Event::Rule => lines.add_plain(1),
            _ => {}
        }
    }
    lines.close();
    lines.height
}

struct LineCounter {
    line_height: f64,
    heading_line_height: f64,
    height: f64,
    open: bool,
    heading: bool,
}

impl LineCounter {
    fn new(metrics: &LayoutMetrics) -> Self {
        Self {
            line_height: metrics.comment_line_height,
            heading_line_height: metrics.comment_heading_line_height,
            height: 0.0,
            open: false,
            heading: false,
        }
    }

    fn close(&mut self) {
        if self.open {
            self.height += if self.heading {
                self.heading_line_height
            } else {
                self.line_height
            };
            self.open = false;
        }
    }

    fn add_plain(&mut self, count: usize) {
        self.height += self.line_height * count as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn height(text: &str) -> f64 {
        comment_height(text, &LayoutMetrics::default())
    }

    #[test]
    fn test_blank_comment_has_no_height() {
        assert_eq!(height(""), 0.0);
        assert_eq!(height("  \n "), 0.0);
    }

    #[test]
    fn test_plain_lines() {
        assert_eq!(height("hello"), 16.0);
        assert_eq!(height("first\nsecond"), 32.0);
        assert_eq!(height("first\n\nsecond"), 32.0);
    }

    #[test]
    fn test_heading_is_taller() {
        assert_eq!(height("# Title\nbody"), 40.0);
    }

    #[test]
    fn test_list_items_and_code() {
        assert_eq!(height("- a\n- b\n- c"), 48.0);
        assert_eq!(height("```\nx\ny\n```"), 32.0);
    }

    #[test]
    fn test_inline_markup_stays_on_one_line() {
        assert_eq!(height("some **bold** and `code`"), 16.0);
    }
}
