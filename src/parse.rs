//! Tokenizing of raw header values into `name[=value]` pairs, and parsing of
//! the typed attribute values carried by those pairs.

use std::borrow::Cow;
use std::convert::TryFrom;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::parsing::Parsable;
use time::{OffsetDateTime, PrimitiveDateTime};

// Formats taken from the `cookie` crate's date handling; they cover RFC 1123,
// RFC 850, asctime and the Netscape dash-separated variant.
static FMT1: &[BorrowedFormatItem<'_>] = format_description!("[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT");
static FMT2: &[BorrowedFormatItem<'_>] = format_description!("[weekday], [day]-[month repr:short]-[year repr:last_two] [hour]:[minute]:[second] GMT");
static FMT3: &[BorrowedFormatItem<'_>] = format_description!("[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year padding:none]");
static FMT4: &[BorrowedFormatItem<'_>] = format_description!("[weekday repr:short], [day]-[month repr:short]-[year padding:none] [hour]:[minute]:[second] GMT");

/// One `;`-delimited piece of a header: a trimmed name and, if the piece had
/// an `=`, its unquoted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pair<'c> {
    pub name: &'c str,
    pub value: Option<Cow<'c, str>>,
}

impl Pair<'_> {
    /// Whether this piece is pure separator noise, like the gap in `a=1;; b=2`.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.value.is_none()
    }
}

/// Iterator over the [`Pair`]s of a header value.
///
/// A `;` inside a quoted value does not end the pair. Text between a closing
/// quote and the next `;` is discarded.
#[derive(Debug, Clone)]
pub(crate) struct Pairs<'c> {
    rest: Option<&'c str>,
}

impl<'c> Pairs<'c> {
    pub fn new(header: &'c str) -> Self {
        Pairs { rest: Some(header) }
    }
}

impl<'c> Iterator for Pairs<'c> {
    type Item = Pair<'c>;

    fn next(&mut self) -> Option<Pair<'c>> {
        let s = self.rest.take()?;
        let end = match s.find(|c: char| c == '=' || c == ';') {
            Some(i) => i,
            None => return Some(Pair { name: s.trim(), value: None }),
        };

        let name = s[..end].trim();
        if s.as_bytes()[end] == b';' {
            self.rest = Some(&s[end + 1..]);
            return Some(Pair { name, value: None });
        }

        let raw = s[end + 1..].trim_start();
        let value = if let Some(quoted) = raw.strip_prefix('"') {
            let (value, after) = unquote(quoted);
            if !after.trim().is_empty() && !after.trim_start().starts_with(';') {
                log::trace!("discarding text after the quoted value of {:?}", name);
            }

            self.rest = after.find(';').map(|i| &after[i + 1..]);
            value
        } else {
            match raw.find(';') {
                Some(i) => {
                    self.rest = Some(&raw[i + 1..]);
                    Cow::Borrowed(raw[..i].trim_end())
                }
                None => Cow::Borrowed(raw.trim_end()),
            }
        };

        Some(Pair { name, value: Some(value) })
    }
}

/// Unquotes the text following an opening `"`, returning the value and the
/// input remaining after the closing quote.
///
/// `\\` and `\"` are unescaped; any other backslash is kept literally. An
/// unterminated quote runs to the end of the input.
pub(crate) fn unquote(s: &str) -> (Cow<'_, str>, &str) {
    fn collect<'a>(owned: Option<String>, tail: &'a str) -> Cow<'a, str> {
        match owned {
            Some(mut buf) => {
                buf.push_str(tail);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(tail),
        }
    }

    let bytes = s.as_bytes();
    let mut owned: Option<String> = None;
    let (mut start, mut i) = (0, 0);
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return (collect(owned, &s[start..i]), &s[i + 1..]),
            b'\\' if matches!(bytes.get(i + 1), Some(b'"') | Some(b'\\')) => {
                owned.get_or_insert_with(String::new).push_str(&s[start..i]);
                // The escaped character starts the next literal run.
                start = i + 1;
                i += 2;
            }
            _ => i += 1,
        }
    }

    log::trace!("unterminated quoted value");
    (collect(owned, &s[start..]), "")
}

/// The attributes recognized after a cookie's name/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attribute {
    Path,
    Domain,
    Secure,
    HttpOnly,
    MaxAge,
    Expires,
    Version,
    Comment,
    CommentUrl,
    Discard,
    Port,
}

impl Attribute {
    const NAMES: [(&'static str, Attribute); 11] = [
        ("path", Attribute::Path),
        ("domain", Attribute::Domain),
        ("secure", Attribute::Secure),
        ("httponly", Attribute::HttpOnly),
        ("max-age", Attribute::MaxAge),
        ("expires", Attribute::Expires),
        ("version", Attribute::Version),
        ("comment", Attribute::Comment),
        ("commenturl", Attribute::CommentUrl),
        ("discard", Attribute::Discard),
        ("port", Attribute::Port),
    ];

    /// Looks up an attribute by its case-insensitive name.
    pub fn from_name(name: &str) -> Option<Attribute> {
        Attribute::NAMES.iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, attr)| attr)
    }
}

/// Parses a cookie date in any of the supported formats.
pub(crate) fn parse_expires(s: &str) -> Option<OffsetDateTime> {
    [FMT1, FMT2, FMT3, FMT4].iter().find_map(|format| parse_date(s, format).ok())
}

fn parse_date(s: &str, format: &impl Parsable) -> Result<OffsetDateTime, time::Error> {
    // Two-digit (and abbreviated) years map to 1969..=2068.
    let mut date = format.parse(s.as_bytes())?;
    if let Some(y) = date.year().or_else(|| date.year_last_two().map(|v| v as i32)) {
        let offset = match y {
            0..=68 => 2000,
            69..=99 => 1900,
            _ => 0,
        };

        date.set_year(y + offset);
    }

    Ok(PrimitiveDateTime::try_from(date)?.assume_utc())
}

/// Parses an RFC 2965 port list such as `80,8080`, skipping bad entries.
pub(crate) fn parse_ports(list: &str) -> impl Iterator<Item = u16> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u16>() {
            Ok(port) => Some(port),
            Err(e) => {
                log::trace!("skipping port {:?}: {}", token, e);
                None
            }
        })
}
