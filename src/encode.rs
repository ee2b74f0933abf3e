//! Encoding of cookies into a `Cookie` request header value.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::iter::FromIterator;

use crate::{Cookie, Error};

/// The two quoting policies used when encoding.
///
/// A value is wrapped in double quotes, with `\` and `"` backslash-escaped,
/// only when it contains one of the policy's trigger characters:
///
/// | policy     | triggers                                                  |
/// |------------|-----------------------------------------------------------|
/// | `Simple`   | tab, space, `"` `(` `)` `,` `:` `;` `<` `>` `?` `@` `[` `\` `]` `{` `}` |
/// | `Strict`   | everything `Simple` triggers on, plus `/` and `=`         |
///
/// Cookie values use `Simple` so that base64-like values, as issued by load
/// balancers, go out unquoted. The `$path` and `$Domain` qualifiers use
/// `Strict`.
///
/// # Example
///
/// ```rust
/// use cookie_codec::Quoting;
///
/// let value = "WRNWIV2HzJ+EfcQcooRUavrGE5YMwetfBEN3wjvFdFr5Fz0wwaUe0Qoi9jf7EQvWnO1WIt3G6uOqwkU=";
/// assert_eq!(Quoting::Simple.quote(value).to_string(), value);
/// assert_eq!(Quoting::Strict.quote(value).to_string(), format!("\"{}\"", value));
///
/// assert_eq!(Quoting::Simple.quote(r#"say "hi""#).to_string(), r#""say \"hi\"""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quoting {
    /// Quoting used for cookie values.
    Simple,
    /// Quoting used for every other attribute value.
    Strict,
}

impl Quoting {
    /// Returns `true` if `c` forces quoting under `self`.
    pub fn triggers(self, c: char) -> bool {
        match c {
            '\t' | ' ' | '"' | '(' | ')' | ',' | ':' | ';' | '<' | '>' | '?' | '@'
            | '[' | '\\' | ']' | '{' | '}' => true,
            '/' | '=' => self == Quoting::Strict,
            _ => false,
        }
    }

    /// Returns `true` if `value` must be quoted under `self`.
    pub fn needs_quotes(self, value: &str) -> bool {
        value.chars().any(|c| self.triggers(c))
    }

    /// Returns a wrapper displaying `value` quoted as `self` requires.
    pub fn quote(self, value: &str) -> impl fmt::Display + '_ {
        Value { value, quoted: self.needs_quotes(value) }
    }
}

/// A possibly quoted attribute value.
struct Value<'a> {
    value: &'a str,
    quoted: bool,
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.quoted {
            return f.write_str(self.value);
        }

        f.write_str("\"")?;
        let mut rest = self.value;
        while let Some(i) = rest.find(|c: char| c == '\\' || c == '"') {
            f.write_str(&rest[..i])?;
            f.write_str("\\")?;
            f.write_str(&rest[i..=i])?;
            rest = &rest[i + 1..];
        }

        f.write_str(rest)?;
        f.write_str("\"")
    }
}

/// Controls how an encoder treats a cookie path of exactly `/`.
///
/// RFC 6265 §5.2.4 makes `/` the default path, so sending it is redundant.
/// Decoding keeps a `Path=/` attribute as `Some("/")`; whether it is sent
/// back is decided here, once per encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathPolicy {
    /// Encode every path as given, including `/`. The default.
    Preserve,
    /// Drop a path equal to `/` from cookies as they are added.
    ElideDefault,
}

impl Default for PathPolicy {
    fn default() -> Self {
        PathPolicy::Preserve
    }
}

/// Wrapper around `Cookie` whose `Display` implementation writes the cookie
/// the way it appears in a `Cookie` request header.
///
/// A value of this type can be obtained via [`Cookie::encoded()`]. The pairs
/// are written in this order, separated by `"; "`:
///
///   1. `$Version=1`, if the cookie's version is `1` or more,
///   2. `name=value`, with [`Quoting::Simple`] applied to the value,
///   3. `$path=...`, if the cookie has a path, with [`Quoting::Strict`],
///   4. `$Domain=...`, if the cookie has a domain, with [`Quoting::Strict`],
///   5. `$Port="p1,p2"`, always quoted, if the cookie's version is `1` or
///      more and it has ports.
///
/// No other attribute is written.
///
/// # Example
///
/// ```rust
/// use cookie_codec::Cookie;
///
/// let c = Cookie::build("id", "a b")
///     .path("/")
///     .domain("example.com")
///     .secure(true)
///     .version(1)
///     .ports([80, 8080])
///     .finish()
///     .unwrap();
///
/// assert_eq!(
///     c.encoded().to_string(),
///     r#"$Version=1; id="a b"; $path="/"; $Domain=example.com; $Port="80,8080""#
/// );
/// ```
pub struct EncodedCookie<'a, 'c: 'a>(&'a Cookie<'c>);

impl<'a, 'c: 'a> EncodedCookie<'a, 'c> {
    pub(crate) fn new(cookie: &'a Cookie<'c>) -> Self {
        EncodedCookie(cookie)
    }
}

impl fmt::Display for EncodedCookie<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cookie = self.0;
        let rfc2965 = cookie.version() >= 1;
        let mut pairs = PairWriter { f, first: true };

        if rfc2965 {
            pairs.write("$Version", 1)?;
        }

        pairs.write(cookie.name(), Quoting::Simple.quote(cookie.value()))?;

        if let Some(path) = cookie.path() {
            pairs.write("$path", Quoting::Strict.quote(path))?;
        }

        if let Some(domain) = cookie.domain() {
            pairs.write("$Domain", Quoting::Strict.quote(domain))?;
        }

        if rfc2965 && !cookie.ports().is_empty() {
            pairs.write("$Port", PortList(cookie.ports()))?;
        }

        Ok(())
    }
}

impl fmt::Debug for EncodedCookie<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncodedCookie").field(&self.to_string()).finish()
    }
}

/// Writes `name=value` pairs separated by `"; "`.
struct PairWriter<'a, 'f> {
    f: &'a mut fmt::Formatter<'f>,
    first: bool,
}

impl PairWriter<'_, '_> {
    fn write(&mut self, name: &str, value: impl fmt::Display) -> fmt::Result {
        if !self.first {
            self.f.write_str("; ")?;
        }

        self.first = false;
        write!(self.f, "{}={}", name, value)
    }
}

/// A port list, always quoted: `"80,8080"`.
struct PortList<'a>(&'a BTreeSet<u16>);

impl fmt::Display for PortList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for (i, port) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }

            write!(f, "{}", port)?;
        }

        f.write_str("\"")
    }
}

/// Collects cookies and encodes them into a single `Cookie` header value.
///
/// Cookies are buffered in the order documented on [`Cookie`], never in
/// insertion order, so encoding the same cookies always yields the same
/// string. Adding a cookie equal to a buffered one (same name, value, path
/// and domain) replaces the buffered one.
///
/// [`encode()`](CookieEncoder::encode()) consumes the encoder; to encode
/// again, build a new encoder and add the cookies again.
///
/// An encoder is meant for one caller using it sequentially. Adding requires
/// `&mut self`, so sharing one across threads needs external locking.
///
/// # Example
///
/// ```rust
/// use cookie_codec::{Cookie, CookieEncoder};
///
/// let mut encoder = CookieEncoder::new();
/// encoder.add(Cookie::new("b", "2").unwrap());
/// encoder.add(Cookie::build("a", "1").path("/a").finish().unwrap());
/// encoder.add_pair("c", "hello world").unwrap();
///
/// assert_eq!(encoder.encode(), r#"a=1; $path="/a"; b=2; c="hello world""#);
/// ```
///
/// With [`PathPolicy::ElideDefault`], a path of `/` is not sent:
///
/// ```rust
/// use cookie_codec::{decode, CookieEncoder, PathPolicy};
///
/// let mut encoder = CookieEncoder::with_path_policy(PathPolicy::ElideDefault);
/// encoder.extend(decode("JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB; Path=/; HttpOnly"));
/// assert_eq!(encoder.encode(), "JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CookieEncoder<'c> {
    cookies: BTreeSet<Cookie<'c>>,
    path_policy: PathPolicy,
}

impl<'c> CookieEncoder<'c> {
    /// Creates an empty encoder with the default [`PathPolicy::Preserve`].
    pub fn new() -> Self {
        CookieEncoder::default()
    }

    /// Creates an empty encoder with the given path policy.
    pub fn with_path_policy(path_policy: PathPolicy) -> Self {
        CookieEncoder { cookies: BTreeSet::new(), path_policy }
    }

    /// Returns the path policy of `self`.
    #[inline]
    pub fn path_policy(&self) -> PathPolicy {
        self.path_policy
    }

    /// Adds `cookie` to the encoder, replacing an equal cookie.
    pub fn add(&mut self, mut cookie: Cookie<'c>) {
        if self.path_policy == PathPolicy::ElideDefault && cookie.path() == Some("/") {
            cookie.unset_path();
        }

        if let Some(replaced) = self.cookies.replace(cookie) {
            log::trace!("replaced buffered cookie {:?}", replaced.name());
        }
    }

    /// Adds a cookie with the given name and value and no other attributes.
    ///
    /// # Errors
    ///
    /// Returns an error, adding nothing, if `name` is not a valid cookie
    /// name.
    pub fn add_pair<N, V>(&mut self, name: N, value: V) -> Result<(), Error>
        where N: Into<Cow<'c, str>>,
              V: Into<Cow<'c, str>>
    {
        self.add(Cookie::new(name, value)?);
        Ok(())
    }

    /// Adds `cookie` to the encoder and returns it, for chaining.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::{Cookie, CookieEncoder};
    ///
    /// let header = CookieEncoder::new()
    ///     .cookie(Cookie::new("b", "2").unwrap())
    ///     .cookie(Cookie::new("a", "1").unwrap())
    ///     .encode();
    ///
    /// assert_eq!(header, "a=1; b=2");
    /// ```
    #[inline]
    pub fn cookie(mut self, cookie: Cookie<'c>) -> Self {
        self.add(cookie);
        self
    }

    /// Returns the number of buffered cookies.
    #[inline]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if no cookie has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Returns an iterator over the buffered cookies, in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = &Cookie<'c>> {
        self.cookies.iter()
    }

    /// Encodes every buffered cookie into a header value, consuming `self`.
    ///
    /// Returns an empty string if no cookie was added.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::CookieEncoder;
    ///
    /// assert_eq!(CookieEncoder::new().encode(), "");
    /// ```
    pub fn encode(self) -> String {
        let header = self.cookies.iter()
            .map(|cookie| cookie.encoded().to_string())
            .collect::<Vec<_>>()
            .join("; ");

        log::debug!("encoded {} cookie(s) into {} bytes", self.cookies.len(), header.len());
        header
    }
}

impl<'c> Extend<Cookie<'c>> for CookieEncoder<'c> {
    fn extend<I: IntoIterator<Item = Cookie<'c>>>(&mut self, cookies: I) {
        for cookie in cookies {
            self.add(cookie);
        }
    }
}

impl<'c> FromIterator<Cookie<'c>> for CookieEncoder<'c> {
    fn from_iter<I: IntoIterator<Item = Cookie<'c>>>(cookies: I) -> Self {
        let mut encoder = CookieEncoder::new();
        encoder.extend(cookies);
        encoder
    }
}
