use std::borrow::Cow;
use std::fmt;

use time::{Duration, OffsetDateTime};

use crate::error::{validate_name, Error};
use crate::Cookie;

/// Structure that follows the builder pattern for building `Cookie` structs.
///
/// To construct a cookie:
///
///   1. Call [`Cookie::build()`] to start building.
///   2. Use any of the builder methods to set fields in the cookie.
///   3. Call [`CookieBuilder::finish()`] to validate the name and retrieve
///      the built cookie.
///
/// ```rust
/// use cookie_codec::{Cookie, CookieEncoder};
/// use cookie_codec::time::Duration;
///
/// let cookie = Cookie::build("name", "value")
///     .domain("www.rust-lang.org")
///     .path("/docs")
///     .secure(true)
///     .http_only(true)
///     .max_age(Duration::days(1))
///     .finish()
///     .unwrap();
///
/// let header = CookieEncoder::new().cookie(cookie).encode();
/// assert_eq!(header, r#"name=value; $path="/docs"; $Domain=www.rust-lang.org"#);
/// ```
#[derive(Debug, Clone)]
pub struct CookieBuilder<'c> {
    /// The cookie being built. Its name is not validated until `finish()`.
    cookie: Cookie<'c>,
}

impl<'c> CookieBuilder<'c> {
    /// Creates a new `CookieBuilder` instance from the given name and value.
    ///
    /// This method is typically called indirectly via [`Cookie::build()`].
    pub fn new<N, V>(name: N, value: V) -> Self
        where N: Into<Cow<'c, str>>,
              V: Into<Cow<'c, str>>
    {
        CookieBuilder { cookie: Cookie::unchecked(name, value) }
    }

    /// Sets the `domain` field in the cookie being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let c = Cookie::build("foo", "bar").domain("www.rust-lang.org");
    /// assert_eq!(c.inner().domain(), Some("www.rust-lang.org"));
    /// ```
    pub fn domain<D: Into<Cow<'c, str>>>(mut self, value: D) -> Self {
        self.cookie.set_domain(value);
        self
    }

    /// Sets the `path` field in the cookie being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let c = Cookie::build("foo", "bar").path("/");
    /// assert_eq!(c.inner().path(), Some("/"));
    /// ```
    pub fn path<P: Into<Cow<'c, str>>>(mut self, path: P) -> Self {
        self.cookie.set_path(path);
        self
    }

    /// Sets the `expires` field in the cookie being built.
    #[inline]
    pub fn expires(mut self, when: OffsetDateTime) -> Self {
        self.cookie.set_expires(when);
        self
    }

    /// Sets the `max_age` field in the cookie being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    /// use cookie_codec::time::Duration;
    ///
    /// let c = Cookie::build("foo", "bar").max_age(Duration::minutes(30));
    /// assert_eq!(c.inner().max_age(), Some(Duration::seconds(30 * 60)));
    /// ```
    #[inline]
    pub fn max_age(mut self, value: Duration) -> Self {
        self.cookie.set_max_age(value);
        self
    }

    /// Sets the `secure` field in the cookie being built.
    #[inline]
    pub fn secure(mut self, value: bool) -> Self {
        self.cookie.set_secure(value);
        self
    }

    /// Sets the `http_only` field in the cookie being built.
    #[inline]
    pub fn http_only(mut self, value: bool) -> Self {
        self.cookie.set_http_only(value);
        self
    }

    /// Sets the RFC 2965 `comment` field in the cookie being built.
    pub fn comment<C: Into<Cow<'c, str>>>(mut self, comment: C) -> Self {
        self.cookie.set_comment(Some(comment));
        self
    }

    /// Sets the RFC 2965 `comment_url` field in the cookie being built.
    pub fn comment_url<C: Into<Cow<'c, str>>>(mut self, url: C) -> Self {
        self.cookie.set_comment_url(Some(url));
        self
    }

    /// Sets the RFC 2965 `discard` field in the cookie being built.
    #[inline]
    pub fn discard(mut self, value: bool) -> Self {
        self.cookie.set_discard(value);
        self
    }

    /// Sets the `version` field in the cookie being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let c = Cookie::build("foo", "bar").version(1);
    /// assert_eq!(c.to_string(), "$Version=1; foo=bar");
    /// ```
    #[inline]
    pub fn version(mut self, version: u32) -> Self {
        self.cookie.set_version(version);
        self
    }

    /// Adds `port` to the port list of the cookie being built.
    ///
    /// Ports are only encoded for cookies with a version of `1` or more.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let c = Cookie::build("foo", "bar").port(8080).port(80);
    /// assert_eq!(c.to_string(), "foo=bar");
    ///
    /// let c = c.version(1);
    /// assert_eq!(c.to_string(), r#"$Version=1; foo=bar; $Port="80,8080""#);
    /// ```
    #[inline]
    pub fn port(mut self, port: u16) -> Self {
        self.cookie.add_port(port);
        self
    }

    /// Replaces the port list of the cookie being built.
    pub fn ports<I: IntoIterator<Item = u16>>(mut self, ports: I) -> Self {
        self.cookie.set_ports(ports);
        self
    }

    /// Returns a borrow to the cookie currently being built.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::Cookie;
    ///
    /// let builder = Cookie::build("name", "value")
    ///     .domain("www.rust-lang.org")
    ///     .path("/")
    ///     .http_only(true);
    ///
    /// assert_eq!(builder.inner().name_value(), ("name", "value"));
    /// assert_eq!(builder.inner().domain(), Some("www.rust-lang.org"));
    /// assert_eq!(builder.inner().path(), Some("/"));
    /// assert_eq!(builder.inner().http_only(), true);
    /// assert_eq!(builder.inner().secure(), false);
    /// ```
    #[inline]
    pub fn inner(&self) -> &Cookie<'c> {
        &self.cookie
    }

    /// Returns a mutable borrow to the cookie currently being built.
    #[inline]
    pub fn inner_mut(&mut self) -> &mut Cookie<'c> {
        &mut self.cookie
    }

    /// Finishes building and returns the built `Cookie`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie's name is empty or contains a control
    /// character, whitespace, `=` or `;`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cookie_codec::{Cookie, Error};
    ///
    /// let c = Cookie::build("foo", "bar").domain("crates.io").finish().unwrap();
    /// assert_eq!(c.domain(), Some("crates.io"));
    ///
    /// let err = Cookie::build("", "bar").finish().unwrap_err();
    /// assert_eq!(err, Error::EmptyName);
    /// ```
    pub fn finish(self) -> Result<Cookie<'c>, Error> {
        validate_name(self.cookie.name())?;
        Ok(self.cookie)
    }
}

/// Writes the cookie being built the way [`Cookie::encoded()`] would.
impl fmt::Display for CookieBuilder<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cookie.encoded().fmt(f)
    }
}

impl<'a> AsRef<Cookie<'a>> for CookieBuilder<'a> {
    fn as_ref(&self) -> &Cookie<'a> {
        &self.cookie
    }
}

impl<'c> From<Cookie<'c>> for CookieBuilder<'c> {
    fn from(cookie: Cookie<'c>) -> Self {
        CookieBuilder { cookie }
    }
}
