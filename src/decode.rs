//! Decoding of `Set-Cookie` and `Cookie` header values.
//!
//! The decoder is a two-state machine driven by the `;`-delimited pairs of a
//! header. While *scanning* there is no open cookie and the next acceptable
//! pair starts one. While *qualifying* every recognized attribute, plain or
//! `$`-prefixed, attaches to the open cookie, and any other name closes it
//! and starts the next cookie. That is how several cookies packed into one
//! header are told apart:
//!
//! ```text
//! a=1; Path=/a; b=2; Secure        $Version=1; a=1; $Path=/a; b=2
//! └─ a ───────┘ └─ b ─────┘        └─ version ┘└─ a ──────┘ └ b ┘
//! ```

use std::borrow::Cow;
use std::iter::FusedIterator;
use std::mem;

use time::Duration;

use crate::parse::{parse_expires, parse_ports, Attribute, Pair, Pairs};
use crate::{Cookie, CookieSet};

/// Decodes a raw header value into the set of cookies it defines.
///
/// `header` is the value of a single `Set-Cookie` or `Cookie` header, without
/// the header name and line terminator. Decoding never fails: malformed
/// pairs are skipped and an undecodable header yields an empty set.
///
/// When the header defines the same cookie (same name, value, path and
/// domain) more than once, the first definition is kept.
///
/// # Example
///
/// ```rust
/// use cookie_codec::decode;
///
/// let cookies = decode("a=1; b=2; Path=/b; HttpOnly");
/// let mut iter = cookies.iter();
///
/// let b = iter.next().unwrap();
/// assert_eq!(b.name_value(), ("b", "2"));
/// assert_eq!(b.path(), Some("/b"));
/// assert!(b.http_only());
///
/// let a = iter.next().unwrap();
/// assert_eq!(a.name_value(), ("a", "1"));
/// assert_eq!(a.path(), None);
/// assert!(!a.http_only());
///
/// assert!(decode("").is_empty());
/// assert!(decode("; Path=/").is_empty());
/// ```
pub fn decode(header: &str) -> CookieSet<'_> {
    let mut cookies = CookieSet::new();
    for cookie in Cookie::split(header) {
        if !cookies.insert(cookie) {
            log::trace!("ignoring duplicate cookie definition");
        }
    }

    cookies
}

/// Iterator over the cookies of a header value, in header order.
///
/// Obtained via [`Cookie::split()`]. Unlike [`decode()`], duplicate
/// definitions are all yielded.
#[derive(Debug, Clone)]
pub struct SplitCookies<'c> {
    pairs: Pairs<'c>,
    state: State<'c>,
    /// Whether the first pair of the header has been seen.
    started: bool,
    /// Version announced by the latest `$Version` qualifier.
    version: u32,
}

#[derive(Debug, Clone)]
enum State<'c> {
    /// No cookie is open; looking for the pair that starts the next one.
    Scanning,
    /// Attributes attach to the open cookie.
    Qualifying(Cookie<'c>),
}

impl<'c> SplitCookies<'c> {
    pub(crate) fn new(header: &'c str) -> Self {
        SplitCookies {
            pairs: Pairs::new(header),
            state: State::Scanning,
            started: false,
            version: 0,
        }
    }

    /// Feeds one pair to the state machine, returning a cookie if the pair
    /// closed one.
    fn step(&mut self, pair: Pair<'c>, first: bool) -> Option<Cookie<'c>> {
        let (qualifier, name) = match pair.name.strip_prefix('$') {
            Some(name) => (true, name),
            None => (false, pair.name),
        };

        // `$Version` qualifies the open cookie, if any, and every cookie
        // after it in the header.
        if qualifier && name.eq_ignore_ascii_case("version") {
            match pair.value.as_deref().map(str::parse::<u32>) {
                Some(Ok(version)) => {
                    self.version = version;
                    if let State::Qualifying(cookie) = &mut self.state {
                        cookie.version = version;
                    }
                }
                _ => log::trace!("ignoring bad $Version {:?}", pair.value),
            }

            return None;
        }

        let attribute = Attribute::from_name(name);
        match &mut self.state {
            State::Scanning if qualifier || (attribute.is_some() && !first) => {
                log::trace!("ignoring {:?}: no cookie to attach it to", pair.name);
                None
            }
            State::Scanning => {
                self.open(pair);
                None
            }
            State::Qualifying(cookie) => match attribute {
                Some(attribute) => {
                    apply(cookie, attribute, pair.value);
                    None
                }
                None if qualifier => {
                    log::trace!("ignoring unknown qualifier {:?}", pair.name);
                    None
                }
                None => {
                    let closed = self.close();
                    self.open(pair);
                    closed
                }
            },
        }
    }

    /// Starts a new cookie from `pair`, provided its name is valid.
    fn open(&mut self, pair: Pair<'c>) {
        match Cookie::new(pair.name, pair.value.unwrap_or_default()) {
            Ok(mut cookie) => {
                cookie.version = self.version;
                self.state = State::Qualifying(cookie);
            }
            Err(e) => log::trace!("dropping cookie definition: {}", e),
        }
    }

    /// Closes the open cookie, if any.
    fn close(&mut self) -> Option<Cookie<'c>> {
        match mem::replace(&mut self.state, State::Scanning) {
            State::Qualifying(mut cookie) => {
                if cookie.version == 0 && !cookie.ports.is_empty() {
                    log::trace!("dropping ports of version 0 cookie {:?}", cookie.name());
                    cookie.ports.clear();
                }

                Some(cookie)
            }
            State::Scanning => None,
        }
    }
}

/// Applies a recognized attribute to `cookie`. Values that fail to parse are
/// ignored.
fn apply<'c>(cookie: &mut Cookie<'c>, attribute: Attribute, value: Option<Cow<'c, str>>) {
    match attribute {
        Attribute::Secure => cookie.secure = true,
        Attribute::HttpOnly => cookie.http_only = true,
        Attribute::Discard => cookie.discard = true,
        Attribute::Path => cookie.path = value.or(cookie.path.take()),
        Attribute::Domain => cookie.domain = value.or(cookie.domain.take()),
        Attribute::Comment => cookie.comment = value.or(cookie.comment.take()),
        Attribute::CommentUrl => cookie.comment_url = value.or(cookie.comment_url.take()),
        Attribute::MaxAge => match value.as_deref().map(str::parse::<i64>) {
            Some(Ok(seconds)) => cookie.max_age = Some(Duration::seconds(seconds)),
            _ => log::trace!("ignoring bad Max-Age {:?}", value),
        },
        Attribute::Expires => match value.as_deref().and_then(parse_expires) {
            Some(expires) => cookie.expires = Some(expires),
            None => log::trace!("ignoring bad Expires {:?}", value),
        },
        Attribute::Version => match value.as_deref().map(str::parse::<u32>) {
            Some(Ok(version)) => cookie.version = version,
            _ => log::trace!("ignoring bad Version {:?}", value),
        },
        Attribute::Port => {
            if let Some(list) = value.as_deref() {
                cookie.ports.extend(parse_ports(list));
            }
        }
    }
}

impl<'c> Iterator for SplitCookies<'c> {
    type Item = Cookie<'c>;

    fn next(&mut self) -> Option<Cookie<'c>> {
        while let Some(pair) = self.pairs.next() {
            let first = !mem::replace(&mut self.started, true);
            if pair.is_blank() {
                continue;
            }

            if let Some(cookie) = self.step(pair, first) {
                return Some(cookie);
            }
        }

        self.close()
    }
}

impl FusedIterator for SplitCookies<'_> {}
