//! `Serialize` and `Deserialize` for [`Cookie`], behind the `serde` feature.
//!
//! A cookie serializes as a struct named `Cookie`. `max_age` is written in
//! whole seconds and `expires` as a Unix timestamp.

use std::collections::BTreeSet;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use time::{Duration, OffsetDateTime};

use crate::Cookie;

impl Serialize for Cookie<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Cookie", 13)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("value", self.value())?;
        state.serialize_field("domain", &self.domain())?;
        state.serialize_field("path", &self.path())?;
        state.serialize_field("comment", &self.comment())?;
        state.serialize_field("comment_url", &self.comment_url())?;
        state.serialize_field("max_age", &self.max_age().map(|age| age.whole_seconds()))?;
        state.serialize_field("expires", &self.expires().map(|time| time.unix_timestamp()))?;
        state.serialize_field("secure", &self.secure())?;
        state.serialize_field("http_only", &self.http_only())?;
        state.serialize_field("discard", &self.discard())?;
        state.serialize_field("version", &self.version())?;
        state.serialize_field("ports", self.ports())?;
        state.end()
    }
}

#[derive(serde::Deserialize)]
#[serde(rename = "Cookie")]
struct CookieRepr {
    name: String,
    value: String,
    domain: Option<String>,
    path: Option<String>,
    comment: Option<String>,
    comment_url: Option<String>,
    max_age: Option<i64>,
    expires: Option<i64>,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    http_only: bool,
    #[serde(default)]
    discard: bool,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    ports: BTreeSet<u16>,
}

impl<'de> Deserialize<'de> for Cookie<'static> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = CookieRepr::deserialize(deserializer)?;
        let mut cookie = Cookie::new(repr.name, repr.value).map_err(de::Error::custom)?;
        cookie.domain = repr.domain.map(Into::into);
        cookie.path = repr.path.map(Into::into);
        cookie.comment = repr.comment.map(Into::into);
        cookie.comment_url = repr.comment_url.map(Into::into);
        cookie.max_age = repr.max_age.map(Duration::seconds);
        cookie.expires = repr.expires
            .map(OffsetDateTime::from_unix_timestamp)
            .transpose()
            .map_err(de::Error::custom)?;
        cookie.secure = repr.secure;
        cookie.http_only = repr.http_only;
        cookie.discard = repr.discard;
        cookie.version = repr.version;
        cookie.ports = repr.ports;
        Ok(cookie)
    }
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_de_tokens, assert_de_tokens_error, assert_ser_tokens, Token};
    use time::macros::datetime;

    use crate::Cookie;

    #[test]
    fn serialize_full_cookie() {
        let cookie = Cookie::build("a", "b")
            .domain("example.com")
            .path("/p")
            .expires(datetime!(1970-01-01 00:01:40 UTC))
            .max_age(time::Duration::minutes(1))
            .secure(true)
            .version(1)
            .ports([80])
            .finish()
            .unwrap();

        assert_ser_tokens(&cookie, &[
            Token::Struct { name: "Cookie", len: 13 },
            Token::Str("name"), Token::Str("a"),
            Token::Str("value"), Token::Str("b"),
            Token::Str("domain"), Token::Some, Token::Str("example.com"),
            Token::Str("path"), Token::Some, Token::Str("/p"),
            Token::Str("comment"), Token::None,
            Token::Str("comment_url"), Token::None,
            Token::Str("max_age"), Token::Some, Token::I64(60),
            Token::Str("expires"), Token::Some, Token::I64(100),
            Token::Str("secure"), Token::Bool(true),
            Token::Str("http_only"), Token::Bool(false),
            Token::Str("discard"), Token::Bool(false),
            Token::Str("version"), Token::U32(1),
            Token::Str("ports"), Token::Seq { len: Some(1) }, Token::U16(80), Token::SeqEnd,
            Token::StructEnd,
        ]);
    }

    #[test]
    fn deserialize_minimal_cookie() {
        let cookie = Cookie::build("a", "b").path("/p").finish().unwrap();

        assert_de_tokens(&cookie, &[
            Token::Struct { name: "Cookie", len: 3 },
            Token::Str("name"), Token::Str("a"),
            Token::Str("value"), Token::Str("b"),
            Token::Str("path"), Token::Some, Token::Str("/p"),
            Token::StructEnd,
        ]);
    }

    #[test]
    fn deserialize_rejects_invalid_names() {
        assert_de_tokens_error::<Cookie<'static>>(&[
            Token::Struct { name: "Cookie", len: 2 },
            Token::Str("name"), Token::Str(""),
            Token::Str("value"), Token::Str("b"),
            Token::StructEnd,
        ], "the cookie name is empty");
    }
}
