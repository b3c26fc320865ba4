//! Content negotiation formats.

use std::fmt;

/// Response format negotiated from the request Accept header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
    Xml,
    Csv,
    Txt,
    Form,
    Unknown,
}

impl Format {
    /// Negotiate a format from the raw Accept header value.
    ///
    /// Only the first (highest-preference) entry is considered; a missing
    /// header negotiates to HTML, the conventional browser default.
    pub fn from_accept_header(accept: Option<&str>) -> Self {
        let Some(accept) = accept else {
            return Format::Html;
        };
        let first = accept
            .split(',')
            .next()
            .unwrap_or("")
            .split(';')
            .next()
            .unwrap_or("")
            .trim();
        match first.to_ascii_lowercase().as_str() {
            "text/html" | "application/xhtml+xml" | "*/*" => Format::Html,
            "application/json" | "text/json" => Format::Json,
            "application/xml" | "text/xml" => Format::Xml,
            "text/csv" => Format::Csv,
            "text/plain" => Format::Txt,
            "application/x-www-form-urlencoded" => Format::Form,
            _ => Format::Unknown,
        }
    }

    /// The canonical MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Html => "text/html",
            Format::Json => "application/json",
            Format::Xml => "application/xml",
            Format::Csv => "text/csv",
            Format::Txt => "text/plain",
            Format::Form => "application/x-www-form-urlencoded",
            Format::Unknown => "application/octet-stream",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}
