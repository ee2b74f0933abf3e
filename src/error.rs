//! The error type returned when constructing a cookie with an invalid name.

/// Error returned when a [`Cookie`](crate::Cookie) would violate the name
/// invariant.
///
/// Decoding and encoding never fail; this is only produced by the validating
/// constructors ([`Cookie::new()`](crate::Cookie::new()),
/// [`CookieBuilder::finish()`](crate::CookieBuilder::finish()), and friends).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The cookie name is empty.
    #[error("the cookie name is empty")]
    EmptyName,
    /// The cookie name contains a control character, whitespace, `=` or `;`.
    #[error("the cookie name {name:?} contains the invalid character {ch:?}")]
    InvalidName {
        /// The offending name.
        name: String,
        /// The first invalid character found in `name`.
        ch: char,
    },
}

/// Checks that `name` is usable as a cookie name.
pub(crate) fn validate_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    match name.chars().find(|&c| c.is_control() || c.is_whitespace() || c == '=' || c == ';') {
        Some(ch) => Err(Error::InvalidName { name: name.to_string(), ch }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_name, Error};

    #[test]
    fn valid_names() {
        assert!(validate_name("JSESSIONID").is_ok());
        assert!(validate_name("BIGipServerSome.POOL").is_ok());
        assert!(validate_name("__Host-id").is_ok());
    }

    #[test]
    fn invalid_names() {
        assert_eq!(validate_name(""), Err(Error::EmptyName));
        assert_eq!(
            validate_name("a b"),
            Err(Error::InvalidName { name: "a b".into(), ch: ' ' })
        );
        assert!(matches!(validate_name("a=b"), Err(Error::InvalidName { ch: '=', .. })));
        assert!(matches!(validate_name("a;b"), Err(Error::InvalidName { ch: ';', .. })));
        assert!(matches!(validate_name("a\tb"), Err(Error::InvalidName { ch: '\t', .. })));
        assert!(matches!(validate_name("a\u{7f}"), Err(Error::InvalidName { ch: '\u{7f}', .. })));
    }

    #[test]
    fn display() {
        assert_eq!(Error::EmptyName.to_string(), "the cookie name is empty");
        let err = Error::InvalidName { name: "a b".into(), ch: ' ' };
        assert_eq!(err.to_string(), "the cookie name \"a b\" contains the invalid character ' '");
    }
}
