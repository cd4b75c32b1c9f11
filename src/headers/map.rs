use std::fmt;

use super::HeaderError;
use crate::matches::{find_crlf, is_field_value, is_token};

const CRLF_LEN: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
struct HeaderField {
    /// Always lowercase.
    name: String,
    value: String,
}

/// HTTP header fields.
///
/// Fields are kept in insertion order, which is also the order [`Headers::iter`] yields them and
/// the order they are written on the wire.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<HeaderField>,
}

impl Headers {
    /// Create new empty [`Headers`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Create new empty [`Headers`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { fields: Vec::with_capacity(capacity) }
    }

    /// Returns the number of distinct header names.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there is no header.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ===== Parsing =====

impl Headers {
    /// Parse a single header line from the start of `bytes`.
    ///
    /// Returns the number of bytes consumed and whether the end of the header section was
    /// reached:
    ///
    /// - `(0, false)`: no complete line yet, more bytes are required.
    /// - `(2, true)`: `bytes` starts with an empty line, the header section is over. Nothing is
    ///   inserted.
    /// - `(n, false)`: one field was parsed and stored, `n` includes the trailing CRLF.
    ///
    /// On error nothing is inserted.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<(usize, bool), HeaderError> {
        let Some(end) = find_crlf(bytes) else {
            return Ok((0, false));
        };

        if end == 0 {
            return Ok((CRLF_LEN, true));
        }

        let line = bytes[..end].trim_ascii_start();

        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return Err(HeaderError::MissingColon);
        };

        // whitespace between name and colon is rejected by the token check
        let name = &line[..colon];
        validate_name(name)?;

        // obs-text is kept, bytes that are not UTF-8 are replaced
        let value = line[colon + 1..].trim_ascii();
        validate_value(value)?;

        self.append_unchecked(lowercase(name), &String::from_utf8_lossy(value));

        Ok((end + CRLF_LEN, false))
    }
}

// ===== Lookup =====

impl Headers {
    /// Returns the value of the given header name, compared case-insensitively.
    ///
    /// ```rust
    /// use httpfromtcp::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.insert("Content-Type", "text/html");
    /// assert_eq!(headers.get("content-type"), Some("text/html"));
    /// assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
    /// assert_eq!(headers.get("host"), None);
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.fields[i].value.as_str())
    }

    /// Returns `true` if the container has a value for the given header name.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns an iterator over headers as lowercase name and value pair.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.fields.iter() }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name.eq_ignore_ascii_case(name))
    }
}

// ===== Mutation =====

impl Headers {
    /// Insert a header, replacing any previous value.
    ///
    /// Returns the previous value, if any.
    pub fn try_insert(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, HeaderError> {
        validate_name(name.as_bytes())?;
        let value = value.into();
        validate_value(value.as_bytes())?;

        match self.position(name) {
            Some(i) => Ok(Some(std::mem::replace(&mut self.fields[i].value, value))),
            None => {
                self.fields.push(HeaderField { name: lowercase(name.as_bytes()), value });
                Ok(None)
            }
        }
    }

    /// Insert a header, replacing any previous value.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid header name or `value` contains a control character, use
    /// [`Headers::try_insert`] for untrusted input.
    #[track_caller]
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        match self.try_insert(name, value) {
            Ok(prev) => prev,
            Err(err) => panic!("invalid header {name:?}: {err}"),
        }
    }

    /// Append a header value, merging it into an existing field with `", "`.
    pub fn try_append(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        validate_name(name.as_bytes())?;
        validate_value(value.as_bytes())?;
        self.append_unchecked(lowercase(name.as_bytes()), value);
        Ok(())
    }

    /// Append a header value, merging it into an existing field with `", "`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid header name or `value` contains a control character, use
    /// [`Headers::try_append`] for untrusted input.
    #[track_caller]
    pub fn append(&mut self, name: &str, value: &str) {
        if let Err(err) = self.try_append(name, value) {
            panic!("invalid header {name:?}: {err}")
        }
    }

    /// Remove a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let i = self.position(name)?;
        Some(self.fields.remove(i).value)
    }

    /// Remove all headers, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// `name` must already be lowercase and valid.
    fn append_unchecked(&mut self, name: String, value: &str) {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => {
                field.value.reserve(value.len() + 2);
                field.value.push_str(", ");
                field.value.push_str(value);
            }
            None => self.fields.push(HeaderField { name, value: value.to_owned() }),
        }
    }
}

fn validate_name(name: &[u8]) -> Result<(), HeaderError> {
    if name.is_empty() || !name.iter().all(|&b| is_token(b)) {
        return Err(HeaderError::InvalidName);
    }
    Ok(())
}

fn validate_value(value: &[u8]) -> Result<(), HeaderError> {
    if !value.iter().all(|&b| is_field_value(b)) {
        return Err(HeaderError::InvalidValue);
    }
    Ok(())
}

/// `name` must be a valid token, which is always ASCII.
fn lowercase(name: &[u8]) -> String {
    name.iter().map(|b| b.to_ascii_lowercase() as char).collect()
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// ===== Iter =====

/// Iterator over header name and value pair, returned from [`Headers::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, HeaderField>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|field| (field.name.as_str(), field.value.as_str()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
