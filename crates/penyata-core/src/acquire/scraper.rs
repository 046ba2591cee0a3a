//! Raw stream scraping for PDFs the conversion tool cannot handle.

use std::path::Path;

use lopdf::{Document, Object};
use tracing::{debug, warn};

use super::{Result, TextAcquirer};

/// Fallback acquirer that scans PDF content streams for text literals.
///
/// A lossy, last-resort reader: it knows nothing about fonts, encodings
/// or layout. Each stream is inflated and its `(...)` string literals
/// are pulled out and joined with spaces. A stream that fails to
/// inflate is scanned as-is, so one corrupt stream never hides the text
/// of the others.
pub struct StreamScraper;

impl StreamScraper {
    pub fn new() -> Self {
        Self
    }

    /// Scrape text literals from raw PDF bytes.
    ///
    /// Bytes that do not parse as a PDF yield an empty string.
    pub fn scrape(&self, data: &[u8]) -> String {
        let doc = match Document::load_mem(data) {
            Ok(doc) => doc,
            Err(err) => {
                warn!("could not parse PDF structure: {}", err);
                return String::new();
            }
        };

        let mut pieces = Vec::new();

        for (_id, object) in doc.objects.iter() {
            if let Object::Stream(stream) = object {
                let content = match stream.decompressed_content() {
                    Ok(content) => content,
                    Err(_) => stream.content.clone(),
                };
                collect_literals(&content, &mut pieces);
            }
        }

        debug!("Scraped {} string literals", pieces.len());
        pieces.join(" ")
    }
}

impl Default for StreamScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAcquirer for StreamScraper {
    fn acquire(&self, path: &Path) -> Result<String> {
        let data = std::fs::read(path)?;
        Ok(self.scrape(&data))
    }
}

/// Collect the contents of `(...)` string literals in a content stream.
fn collect_literals(content: &[u8], pieces: &mut Vec<String>) {
    let mut iter = content.iter();
    let mut literal: Vec<u8> = Vec::new();
    let mut in_literal = false;

    while let Some(&byte) = iter.next() {
        if !in_literal {
            if byte == b'(' {
                in_literal = true;
                literal.clear();
            }
            continue;
        }

        match byte {
            b'\\' => match iter.next() {
                Some(b'(') => literal.push(b'('),
                Some(b')') => literal.push(b')'),
                Some(b'\\') => literal.push(b'\\'),
                Some(&other) => {
                    literal.push(b'\\');
                    literal.push(other);
                }
                None => {}
            },
            b')' => {
                in_literal = false;
                pieces.push(String::from_utf8_lossy(&literal).into_owned());
            }
            _ => literal.push(byte),
        }
    }
}
