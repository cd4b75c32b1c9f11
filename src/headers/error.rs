//! Error types that can occur during header related operation.

/// An error that can occur in header related operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderError {
    /// Header line does not contain a `:` separator.
    MissingColon,
    /// Header name is empty or contains a byte outside the token class, including whitespace
    /// between the name and the colon.
    InvalidName,
    /// Header value contains a control character other than horizontal tab.
    InvalidValue,
}

impl HeaderError {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::MissingColon => "missing colon separator",
            Self::InvalidName => "header name contains invalid character",
            Self::InvalidValue => "header value contains invalid character",
        }
    }
}

impl std::error::Error for HeaderError {}

impl std::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
