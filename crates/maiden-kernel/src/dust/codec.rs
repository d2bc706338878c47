//! Resource URL codec.
//!
//! Maps a resource name onto the externally visible URL under an API
//! prefix and back. Pure string manipulation; nothing here touches the
//! filesystem.
//!
//! Each segment is escaped on its own, so a `/` inside a segment comes out
//! as `%2F` instead of being read as a separator.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Bytes escaped inside a URL path segment.
///
/// Unreserved characters plus `$ & + : = @` pass through. Everything else,
/// including `/`, `;`, `,`, `?`, space, `%` and any non-ASCII byte, is
/// percent-encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Percent-escape a single path segment.
pub fn escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Join `prefix` with the escaped `segments`.
///
/// Empty segments are skipped, so `encode(prefix, [""])` is exactly the
/// (normalized) prefix. The result never ends in `/` unless it is `/`.
pub fn encode<'a, I>(prefix: &str, segments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = prefix.trim_end_matches('/').to_string();
    for segment in segments.into_iter().filter(|s| !s.is_empty()) {
        url.push('/');
        url.push_str(&escape_segment(segment));
    }
    if url.is_empty() && prefix.starts_with('/') {
        url.push('/');
    }
    url
}

/// A URL prefix that resource names are located under.
///
/// `ResourcePath::new("/api/v1/dust").url("notes/to do.txt")` is
/// `/api/v1/dust/notes/to%20do.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    prefix: String,
}

impl ResourcePath {
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: encode(prefix.as_ref(), []),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// URL of a `/`-separated resource name. The empty name is the prefix.
    pub fn url(&self, name: &str) -> String {
        encode(&self.prefix, name.split('/'))
    }

    /// Codec rooted at the URL of `name`, for listing a subdirectory.
    pub fn child(&self, name: &str) -> ResourcePath {
        ResourcePath {
            prefix: self.url(name),
        }
    }

    /// Recover the resource name from a URL produced by [`ResourcePath::url`].
    ///
    /// Returns `None` when the URL is not under this prefix or a segment
    /// does not decode to UTF-8.
    pub fn decode(&self, url: &str) -> Option<String> {
        let rest = if self.prefix == "/" {
            url.strip_prefix('/')?
        } else {
            let rest = url.strip_prefix(self.prefix.as_str())?;
            if rest.is_empty() {
                return Some(String::new());
            }
            rest.strip_prefix('/')?
        };

        let mut segments = Vec::new();
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            let decoded = percent_decode_str(segment).decode_utf8().ok()?;
            segments.push(decoded.into_owned());
        }
        Some(segments.join("/"))
    }
}
