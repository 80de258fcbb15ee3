use pulldown_cmark::{Event, Parser, Tag};

use crate::parsers::{DocumentParser, ParserError};

/// Markdown rendered down to its text content, one block per line.
pub struct MarkdownParser;

impl DocumentParser for MarkdownParser {
    fn format(&self) -> &'static str {
        "markdown"
    }

    fn parse(&self, data: &[u8]) -> Result<String, ParserError> {
        let source = String::from_utf8_lossy(data);
        let mut out = String::with_capacity(source.len());

        for event in Parser::new(&source) {
            match event {
                Event::Text(text) | Event::Code(text) => out.push_str(&text),
                Event::SoftBreak => out.push(' '),
                Event::HardBreak => out.push('\n'),
                Event::End(
                    Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_),
                ) => out.push('\n'),
                _ => {}
            }
        }

        let lines: Vec<&str> = out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Ok(lines.join("\n"))
    }
}
