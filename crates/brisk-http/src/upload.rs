//! Uploaded file handle.

/// A file received as part of a multipart request body.
///
/// Body parsers produce these; the context accumulates them for the life of
/// the request and drops them at teardown.
#[derive(Debug, Clone)]
pub struct Upload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl Upload {
    /// Create an upload for a form field.
    pub fn new(field: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: None,
            content_type: None,
            data,
        }
    }

    /// Set the client-supplied file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Set the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Form field name the file was posted under.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Client-supplied file name, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Declared content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw file bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
