use crate::parsers::{DocumentParser, ParserError};

/// Plain text. Invalid UTF-8 sequences are replaced rather than rejected.
pub struct TextParser;

impl DocumentParser for TextParser {
    fn format(&self) -> &'static str {
        "text"
    }

    fn parse(&self, data: &[u8]) -> Result<String, ParserError> {
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}
