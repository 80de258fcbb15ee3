use crate::parsers::{DocumentParser, ParserError};

pub struct PdfParser;

impl DocumentParser for PdfParser {
    fn format(&self) -> &'static str {
        "pdf"
    }

    fn parse(&self, data: &[u8]) -> Result<String, ParserError> {
        pdf_extract::extract_text_from_mem(data).map_err(|e| ParserError::Extraction {
            format: self.format(),
            message: e.to_string(),
        })
    }
}
