//! Percent-encoding for the path, query and hash sections of a URL.
//!
//! Every encoder starts from the same base: everything but ASCII
//! alphanumerics is escaped. Each [`UrlSection`] then allows a specific set of
//! characters to pass through unescaped. Generated URLs look like the ones
//! users see in the address bar and stay reversible by [`decode`].

use percent_encoding::{
    percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC,
};
use std::borrow::Cow;

/// URI reserved and unreserved marks, plus `|`, `[` and `]`.
const COMMON: &AsciiSet = &NON_ALPHANUMERIC
    // unreserved marks
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    // reserved
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#')
    .remove(b'|')
    .remove(b'[')
    .remove(b']');

const PATH: &AsciiSet = &COMMON.add(b'#').add(b'?');

const PARAM: &AsciiSet = &PATH.add(b'/');

const QUERY_VALUE: &AsciiSet = &COMMON
    .add(b'+')
    .add(b'#')
    .add(b'&')
    .remove(b'`')
    .remove(b'{')
    .remove(b'}')
    .remove(b'^');

const QUERY_KEY: &AsciiSet = &QUERY_VALUE
    .add(b'=')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'^');

const HASH: &AsciiSet = &COMMON.remove(b'{').remove(b'}').remove(b'^');

/// The part of a URL a string is being encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlSection {
    /// A whole path: `/` is kept, `#` and `?` are escaped.
    Path,
    /// A single path param value: like [`UrlSection::Path`] but `/` is escaped.
    Param,
    /// A query key: like [`UrlSection::QueryValue`], but `=` and the
    /// `` ` ``, `{`, `}` and `^` a value keeps are escaped too.
    QueryKey,
    /// A query value: `&`, `#` and `+` are escaped, spaces become `+`.
    /// `` ` ``, `{`, `}` and `^` are kept.
    QueryValue,
    /// The hash, including its leading `#`.
    Hash,
}

impl UrlSection {
    /// The set of bytes that must be percent-encoded in this section.
    pub fn ascii_set(self) -> &'static AsciiSet {
        match self {
            UrlSection::Path => PATH,
            UrlSection::Param => PARAM,
            UrlSection::QueryKey => QUERY_KEY,
            UrlSection::QueryValue => QUERY_VALUE,
            UrlSection::Hash => HASH,
        }
    }

    fn spaces_as_plus(self) -> bool {
        matches!(self, UrlSection::QueryKey | UrlSection::QueryValue)
    }

    /// Encodes `text` for this section.
    pub fn encode(self, text: &str) -> String {
        let encoded = utf8_percent_encode(text, self.ascii_set()).to_string();
        if self.spaces_as_plus() {
            encoded.replace("%20", "+")
        } else {
            encoded
        }
    }
}

pub fn encode_path(text: &str) -> String {
    UrlSection::Path.encode(text)
}

pub fn encode_param(text: &str) -> String {
    UrlSection::Param.encode(text)
}

pub fn encode_query_key(text: &str) -> String {
    UrlSection::QueryKey.encode(text)
}

pub fn encode_query_value(text: &str) -> String {
    UrlSection::QueryValue.encode(text)
}

pub fn encode_hash(text: &str) -> String {
    UrlSection::Hash.encode(text)
}

/// Decodes a percent-encoded string the way `decodeURIComponent` does.
///
/// Malformed escapes and invalid UTF-8 never fail: the original text is
/// returned and a warning is logged.
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }
    if has_malformed_escape(text) {
        tracing::warn!("error decoding \"{text}\", using the original value");
        return Cow::Borrowed(text);
    }
    match percent_decode_str(text).decode_utf8() {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(
                "error decoding \"{text}\" ({e}), using the original value"
            );
            Cow::Borrowed(text)
        }
    }
}

fn has_malformed_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return true;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    false
}
