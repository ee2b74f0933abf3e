//! Client-side HTTP cookie codec.
//!
//! This crate provides the [`Cookie`] type, which directly maps to an HTTP
//! cookie and its attributes, a decoder that splits a raw `Set-Cookie` (or
//! `Cookie`) header value into a [`CookieSet`], and a [`CookieEncoder`] that
//! serializes cookies into a single `Cookie` request header value.
//!
//! # Usage
//!
//! Add the following to the `[dependencies]` section of your `Cargo.toml`:
//!
//! ```toml
//! cookie-codec = "0.1"
//! ```
//!
//! # Decoding and encoding
//!
//! ```rust
//! use cookie_codec::{decode, CookieEncoder};
//!
//! let cookies = decode("JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB; Path=/accounts; HttpOnly");
//! assert_eq!(cookies.len(), 1);
//!
//! let header = cookies.into_iter().collect::<CookieEncoder>().encode();
//! assert_eq!(header, r#"JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB; $path="/accounts""#);
//! ```
//!
//! Both RFC 6265 style headers and RFC 2965 (version 1) headers, with their
//! `$Version`, `$Path`, `$Domain` and `$Port` qualifiers, are understood.
//! Decoding never fails: malformed pieces of a header are dropped and logged
//! at `trace` level through the [`log`](https://docs.rs/log) facade.
//!
//! # Features
//!
//! * **serde** (disabled by default)
//!
//!   Implements `Serialize` and `Deserialize` for [`Cookie`]. Deserialized
//!   cookies are validated exactly like cookies built with [`Cookie::new()`].

mod builder;
mod decode;
mod encode;
mod error;
mod parse;

#[cfg(feature = "serde")]
mod serialize;

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use time::{Duration, OffsetDateTime};

#[doc(inline)]
pub use time;

pub use crate::builder::CookieBuilder;
pub use crate::decode::{decode, SplitCookies};
pub use crate::encode::{CookieEncoder, EncodedCookie, PathPolicy, Quoting};
pub use crate::error::Error;

use crate::error::validate_name;

/// An ordered set of cookies, as produced by [`decode()`].
///
/// Iteration follows the total order documented on [`Cookie`]; two cookies
/// with the same name, value, path and domain occupy a single slot.
pub type CookieSet<'c> = BTreeSet<Cookie<'c>>;

/// Representation of an HTTP cookie.
///
/// # Constructing a `Cookie`
///
/// To construct a cookie with only a name/value, use [`Cookie::new()`]:
///
/// ```rust
/// use cookie_codec::Cookie;
///
/// let cookie = Cookie::new("name", "value").unwrap();
/// assert_eq!(cookie.encoded().to_string(), "name=value");
/// ```
///
/// To construct more elaborate cookies, use [`Cookie::build()`] and
/// [`CookieBuilder`] methods:
///
/// ```rust
/// use cookie_codec::Cookie;
///
/// let cookie = Cookie::build("name", "value")
///     .domain("www.rust-lang.org")
///     .path("/docs")
///     .version(1)
///     .port(443)
///     .finish()
///     .unwrap();
/// ```
///
/// The name of a cookie is never empty and never contains control characters,
/// whitespace, `=` or `;`. The validating constructors return an [`Error`]
/// when given such a name.
///
/// # Identity and ordering
///
/// Cookies are totally ordered so that sets of cookies iterate, and encode,
/// deterministically:
///
///   1. by path length in bytes, longest first (a missing path has length 0),
///   2. then by name,
///   3. then by value,
///   4. then by path and finally by domain, a missing attribute first.
///
/// Two cookies are equal iff their name, value, path and domain are equal.
/// The remaining attributes do not take part in comparisons.
///
/// ```rust
/// use cookie_codec::Cookie;
///
/// let a = Cookie::build("a", "1").path("/accounts").finish().unwrap();
/// let b = Cookie::new("b", "1").unwrap();
/// assert!(a < b);
///
/// let mut c = Cookie::new("b", "1").unwrap();
/// c.set_secure(true);
/// assert_eq!(b, c);
/// ```
#[derive(Debug, Clone)]
pub struct Cookie<'c> {
    /// The cookie's name.
    name: Cow<'c, str>,
    /// The cookie's value.
    value: Cow<'c, str>,
    /// The cookie's domain, if any.
    domain: Option<Cow<'c, str>>,
    /// The cookie's path, if any.
    path: Option<Cow<'c, str>>,
    /// The RFC 2965 comment, if any.
    comment: Option<Cow<'c, str>>,
    /// The RFC 2965 comment URL, if any.
    comment_url: Option<Cow<'c, str>>,
    /// The cookie's maximum age, if any.
    max_age: Option<Duration>,
    /// The cookie's expiration, if any.
    expires: Option<OffsetDateTime>,
    /// Whether this cookie was marked Secure.
    secure: bool,
    /// Whether this cookie was marked HttpOnly.
    http_only: bool,
    /// Whether this cookie was marked Discard.
    discard: bool,
    /// The cookie version; `0` for Netscape/RFC 6265 cookies.
    version: u32,
    /// The RFC 2965 port list. Only meaningful when `version >= 1`.
    ports: BTreeSet<u16>,
}

impl<'c> Cookie<'c> {
    /// Creates a new `Cookie` with the given name and value.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is empty or contains a control character,
    /// whitespace, `=` or `;`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::{Cookie, Error};
    ///
    /// let cookie = Cookie::new("name", "value").unwrap();
    /// assert_eq!(cookie.name_value(), ("name", "value"));
    ///
    /// assert_eq!(Cookie::new("", "value").unwrap_err(), Error::EmptyName);
    /// ```
    pub fn new<N, V>(name: N, value: V) -> Result<Self, Error>
        where N: Into<Cow<'c, str>>,
              V: Into<Cow<'c, str>>
    {
        let cookie = Cookie::unchecked(name, value);
        validate_name(&cookie.name)?;
        Ok(cookie)
    }

    /// Creates a new `Cookie` without validating `name`. Callers must
    /// validate before handing the cookie out.
    pub(crate) fn unchecked<N, V>(name: N, value: V) -> Self
        where N: Into<Cow<'c, str>>,
              V: Into<Cow<'c, str>>
    {
        Cookie {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            comment: None,
            comment_url: None,
            max_age: None,
            expires: None,
            secure: false,
            http_only: false,
            discard: false,
            version: 0,
            ports: BTreeSet::new(),
        }
    }

    /// Creates a new [`CookieBuilder`] starting from the given name and value.
    ///
    /// The name is validated when the builder is finished.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let c = Cookie::build("foo", "bar").path("/foo").finish().unwrap();
    /// assert_eq!(c.name_value(), ("foo", "bar"));
    /// assert_eq!(c.path(), Some("/foo"));
    /// ```
    pub fn build<N, V>(name: N, value: V) -> CookieBuilder<'c>
        where N: Into<Cow<'c, str>>,
              V: Into<Cow<'c, str>>
    {
        CookieBuilder::new(name, value)
    }

    /// Splits a raw header value into its cookies, in the order they appear.
    ///
    /// This is the lazy form of [`decode()`]: duplicates are not removed and
    /// the header order, rather than the cookie order, is preserved.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let mut cookies = Cookie::split("b=2; Path=/b; a=1");
    /// assert_eq!(cookies.next().unwrap().name_value(), ("b", "2"));
    /// assert_eq!(cookies.next().unwrap().name_value(), ("a", "1"));
    /// assert!(cookies.next().is_none());
    /// ```
    pub fn split(header: &'c str) -> SplitCookies<'c> {
        SplitCookies::new(header)
    }

    /// Converts `self` into a `Cookie` with a static lifetime, copying any
    /// string borrowed from a decoded header.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::{decode, Cookie};
    ///
    /// let header = String::from("a=b");
    /// let owned: Cookie<'static> = decode(&header).into_iter().next().unwrap().into_owned();
    /// drop(header);
    /// assert_eq!(owned.name_value(), ("a", "b"));
    /// ```
    pub fn into_owned(self) -> Cookie<'static> {
        fn owned(s: Cow<'_, str>) -> Cow<'static, str> {
            Cow::Owned(s.into_owned())
        }

        Cookie {
            name: owned(self.name),
            value: owned(self.value),
            domain: self.domain.map(owned),
            path: self.path.map(owned),
            comment: self.comment.map(owned),
            comment_url: self.comment_url.map(owned),
            max_age: self.max_age,
            expires: self.expires,
            secure: self.secure,
            http_only: self.http_only,
            discard: self.discard,
            version: self.version,
            ports: self.ports,
        }
    }

    /// Returns the name of `self`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let c = Cookie::new("name", "value").unwrap();
    /// assert_eq!(c.name(), "name");
    /// ```
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of `self`, unquoted and unescaped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    ///
    /// let c = decode(r#"name="a \"quoted\" value""#).into_iter().next().unwrap();
    /// assert_eq!(c.value(), r#"a "quoted" value"#);
    /// ```
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    #[inline]
    pub fn name_value(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// Returns the `Domain` of the cookie if one was specified.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    ///
    /// let c = decode("name=value; Domain=crates.io").into_iter().next().unwrap();
    /// assert_eq!(c.domain(), Some("crates.io"));
    /// ```
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the `Path` of the cookie if one was specified.
    ///
    /// A decoded `Path=/` is kept as `Some("/")`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    ///
    /// let c = decode("name=value").into_iter().next().unwrap();
    /// assert_eq!(c.path(), None);
    ///
    /// let c = decode("name=value; Path=/").into_iter().next().unwrap();
    /// assert_eq!(c.path(), Some("/"));
    /// ```
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the RFC 2965 `Comment` of the cookie if one was specified.
    #[inline]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the RFC 2965 `CommentURL` of the cookie if one was specified.
    #[inline]
    pub fn comment_url(&self) -> Option<&str> {
        self.comment_url.as_deref()
    }

    /// Returns the specified max-age of the cookie if one was specified.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    /// use cookie_codec::time::Duration;
    ///
    /// let c = decode("name=value; Max-Age=3600").into_iter().next().unwrap();
    /// assert_eq!(c.max_age(), Some(Duration::hours(1)));
    /// ```
    #[inline]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Returns the `Expires` time of the cookie if one was specified and it
    /// could be parsed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    ///
    /// let c = decode("name=value; Expires=Wed, 21 Oct 2015 07:28:00 GMT").into_iter().next().unwrap();
    /// assert_eq!(c.expires().map(|t| t.year()), Some(2015));
    /// ```
    #[inline]
    pub fn expires(&self) -> Option<OffsetDateTime> {
        self.expires
    }

    /// Returns whether this cookie was marked `Secure` or not.
    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Returns whether this cookie was marked `HttpOnly` or not.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    ///
    /// let c = decode("name=value; httponly").into_iter().next().unwrap();
    /// assert_eq!(c.http_only(), true);
    /// ```
    #[inline]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Returns whether this cookie was marked `Discard` or not.
    #[inline]
    pub fn discard(&self) -> bool {
        self.discard
    }

    /// Returns the version of the cookie. `0` unless a `Version` attribute or
    /// a `$Version` qualifier said otherwise.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the RFC 2965 port list of the cookie, in ascending order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    ///
    /// let c = decode(r#"name=value; Version=1; Port="8080,80""#).into_iter().next().unwrap();
    /// assert_eq!(c.ports().iter().copied().collect::<Vec<_>>(), vec![80, 8080]);
    /// ```
    #[inline]
    pub fn ports(&self) -> &BTreeSet<u16> {
        &self.ports
    }

    /// Sets the name of `self` to `name`.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving `self` unchanged, if `name` is not a valid
    /// cookie name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let mut c = Cookie::new("name", "value").unwrap();
    /// c.set_name("foo").unwrap();
    /// assert_eq!(c.name(), "foo");
    ///
    /// assert!(c.set_name("f o o").is_err());
    /// assert_eq!(c.name(), "foo");
    /// ```
    pub fn set_name<N: Into<Cow<'c, str>>>(&mut self, name: N) -> Result<(), Error> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Sets the value of `self` to `value`.
    #[inline]
    pub fn set_value<V: Into<Cow<'c, str>>>(&mut self, value: V) {
        self.value = value.into();
    }

    /// Sets the `domain` of `self` to `domain`.
    #[inline]
    pub fn set_domain<D: Into<Cow<'c, str>>>(&mut self, domain: D) {
        self.domain = Some(domain.into());
    }

    /// Unsets the `domain` of `self`.
    #[inline]
    pub fn unset_domain(&mut self) {
        self.domain = None;
    }

    /// Sets the `path` of `self` to `path`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let mut c = Cookie::new("name", "value").unwrap();
    /// assert_eq!(c.path(), None);
    ///
    /// c.set_path("/");
    /// assert_eq!(c.path(), Some("/"));
    /// ```
    #[inline]
    pub fn set_path<P: Into<Cow<'c, str>>>(&mut self, path: P) {
        self.path = Some(path.into());
    }

    /// Unsets the `path` of `self`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::decode;
    ///
    /// let mut c = decode("name=value; Path=/").into_iter().next().unwrap();
    /// c.unset_path();
    /// assert_eq!(c.encoded().to_string(), "name=value");
    /// ```
    #[inline]
    pub fn unset_path(&mut self) {
        self.path = None;
    }

    /// Sets or clears the RFC 2965 comment of `self`.
    #[inline]
    pub fn set_comment<C: Into<Cow<'c, str>>>(&mut self, comment: Option<C>) {
        self.comment = comment.map(Into::into);
    }

    /// Sets or clears the RFC 2965 comment URL of `self`.
    #[inline]
    pub fn set_comment_url<C: Into<Cow<'c, str>>>(&mut self, url: Option<C>) {
        self.comment_url = url.map(Into::into);
    }

    /// Sets or clears the `max_age` of `self`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    /// use cookie_codec::time::Duration;
    ///
    /// let mut c = Cookie::new("name", "value").unwrap();
    /// c.set_max_age(Duration::hours(10));
    /// assert_eq!(c.max_age(), Some(Duration::hours(10)));
    ///
    /// c.set_max_age(None);
    /// assert_eq!(c.max_age(), None);
    /// ```
    #[inline]
    pub fn set_max_age<D: Into<Option<Duration>>>(&mut self, value: D) {
        self.max_age = value.into();
    }

    /// Sets or clears the `expires` field of `self`.
    #[inline]
    pub fn set_expires<T: Into<Option<OffsetDateTime>>>(&mut self, time: T) {
        self.expires = time.into();
    }

    /// Sets the value of `secure` in `self` to `value`.
    #[inline]
    pub fn set_secure(&mut self, value: bool) {
        self.secure = value;
    }

    /// Sets the value of `http_only` in `self` to `value`.
    #[inline]
    pub fn set_http_only(&mut self, value: bool) {
        self.http_only = value;
    }

    /// Sets the value of `discard` in `self` to `value`.
    #[inline]
    pub fn set_discard(&mut self, value: bool) {
        self.discard = value;
    }

    /// Sets the version of `self`. Versions `>= 1` make the encoder emit the
    /// `$Version` and `$Port` qualifiers.
    #[inline]
    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Replaces the port list of `self`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let mut c = Cookie::new("name", "value").unwrap();
    /// c.set_version(1);
    /// c.set_ports([8080, 80, 8080]);
    /// assert_eq!(c.encoded().to_string(), r#"$Version=1; name=value; $Port="80,8080""#);
    /// ```
    pub fn set_ports<I: IntoIterator<Item = u16>>(&mut self, ports: I) {
        self.ports = ports.into_iter().collect();
    }

    /// Adds `port` to the port list of `self`.
    #[inline]
    pub fn add_port(&mut self, port: u16) {
        self.ports.insert(port);
    }

    /// Returns a wrapper whose `Display` implementation writes `self` the
    /// way it appears in a `Cookie` request header.
    ///
    /// See [`CookieEncoder`] for the exact format.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let c = Cookie::build("name", "a value").domain("example.com").finish().unwrap();
    /// assert_eq!(c.encoded().to_string(), r#"name="a value"; $Domain=example.com"#);
    /// ```
    #[inline]
    pub fn encoded<'a>(&'a self) -> EncodedCookie<'a, 'c> {
        EncodedCookie::new(self)
    }
}

/// The total order over cookies; see the [`Cookie`] documentation.
fn order(a: &Cookie<'_>, b: &Cookie<'_>) -> Ordering {
    fn path_len(c: &Cookie<'_>) -> usize {
        c.path().map_or(0, str::len)
    }

    path_len(b).cmp(&path_len(a))
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.value().cmp(b.value()))
        .then_with(|| a.path().cmp(&b.path()))
        .then_with(|| a.domain().cmp(&b.domain()))
}

impl<'a, 'b> PartialEq<Cookie<'b>> for Cookie<'a> {
    fn eq(&self, other: &Cookie<'b>) -> bool {
        order(self, other) == Ordering::Equal
    }
}

impl Eq for Cookie<'_> {}

impl<'a, 'b> PartialOrd<Cookie<'b>> for Cookie<'a> {
    fn partial_cmp(&self, other: &Cookie<'b>) -> Option<Ordering> {
        Some(order(self, other))
    }
}

impl Ord for Cookie<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        order(self, other)
    }
}
