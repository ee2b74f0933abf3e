use cookie_codec::{decode, Cookie, CookieEncoder, CookieSet, PathPolicy};

/// Values issued by F5 BIG-IP load balancers: base64 with `/`, `+` and `=`.
const BIG_IP_VALUES: &[&str] = &[
    "WRNWIV2HzJ+EfcQcooRUavrGE5YMwetfBEN3wjvFdFr5Fz0wwaUe0Qoi9jf7EQvWnO1WIt3G6uOqwkU=",
    "jKhFCnD1S4oJJpkcooRUavrGE5YMwaObL7dZrjm7kb5MeKsk12haway3pK6TvFatsEatiegIROcwLQ==",
    "haA24RDHBZKrZmocooRUavrGE5YMwTRJCC1LDIKC80WM0EpMA4h0nZjrgppHAWMeYiwNwBJcBCrqCvE=",
    "GHeO+TrZy53eHoocooRUavrGE5YMwT350zcsPRmqHQ+eS40/orx66Zp2D5SThyAhZ9ycd2a94uSAdjE=",
    "42nSkUcyvjWjgHDvGBi+wqMsPlQd8Qy5JvPfjPp01rjYoOu6dFDoWaP6kzK5R6TlP6NvMep5UjPT2XM=",
    "ISmVAfSbreVYuDPvGBi+wqMsPlQd8VcKzbdXs/X5bNvpumFqJFovxNX9bfOHFIG/QmaAJikiISaYbD4=",
    "6Zkeyygyrw+vS1fvGBi+wqMsPlQd8R23Gr3w51uxNWYd6kbznxueHG8N/1Vjh2UzDlRiia5Uf3UJItE=",
    "tXd5GCDAxBHwz4ZcPwwnvYzefiV4HvY8Zx3PrRhiea2PrgsHG5nUEE/oqKpAEzJ3geKsPbvkZ9Jhdg==",
    "bf5z2DapQ1iT+gIMeTYoy0WMzP3jtgya9wdZeOomV40GCqcBnozFavRzi0QVtWHR7Q8ieGdDTG0ngw==",
];

fn encode<'c, I: IntoIterator<Item = Cookie<'c>>>(cookies: I) -> String {
    cookies.into_iter().collect::<CookieEncoder<'_>>().encode()
}

fn only(cookies: CookieSet<'_>) -> Cookie<'_> {
    assert_eq!(cookies.len(), 1, "expected exactly one cookie in {:?}", cookies);
    cookies.into_iter().next().unwrap()
}

#[test]
fn decode_unquoted() {
    let c = only(decode("foo=value; domain=/; path=/"));
    assert_eq!(c.value(), "value");
    assert_eq!(c.domain(), Some("/"));
    assert_eq!(c.path(), Some("/"));
}

#[test]
fn decode_nontrivial_unquoted_value() {
    let value = "xAWH1b3RKrqo8AE/EbYaKBLdwZe2p5NKjJHPlQZ48BgFF6/CR8lKFTQv0TEhVIpxLL3b1Wd3dpMH";
    let header = format!("foo={}; domain=/; path=/", value);
    let c = only(decode(&header));
    assert_eq!(c.value(), value);
    assert_eq!(c.domain(), Some("/"));
    assert_eq!(c.path(), Some("/"));
}

#[test]
fn decode_quoted() {
    let header = "ALPHA=\"VALUE1\"; Domain=docs.foo.com; Path=/accounts; \
        Expires=Wed, 13-Jan-2021 22:23:01 GMT; Secure; HttpOnly";
    let c = only(decode(header));
    assert_eq!(c.value(), "VALUE1");
    assert_eq!(c.domain(), Some("docs.foo.com"));
    assert_eq!(c.path(), Some("/accounts"));
    assert!(c.expires().is_some());
    assert!(c.secure() && c.http_only());
}

#[test]
fn decode_quoted_containing_escaped_quote() {
    let header = "ALPHA=\"VALUE1\\\"\"; Domain=docs.foo.com; Path=/accounts; \
        Expires=Wed, 13-Jan-2021 22:23:01 GMT; Secure; HttpOnly";
    let c = only(decode(header));
    assert_eq!(c.value(), "VALUE1\"");
}

#[test]
fn jsessionid_with_default_path() {
    let header = "JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB; Path=/; HttpOnly";
    let mut c = only(decode(header));
    assert_eq!(c.name_value(), ("JSESSIONID", "9C827DD791A2E7E8875A0881A05A7DDB"));
    assert_eq!(c.domain(), None);
    assert_eq!(c.path(), Some("/"));

    assert_eq!(
        encode(vec![c.clone()]),
        r#"JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB; $path="/""#
    );

    c.unset_path();
    assert_eq!(encode(vec![c]), "JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB");
}

#[test]
fn default_path_policy_elides_slash() {
    let header = "JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB; Path=/; HttpOnly";
    let mut encoder = CookieEncoder::with_path_policy(PathPolicy::ElideDefault);
    encoder.extend(decode(header));

    let reencoded = encoder.encode();
    assert_eq!(reencoded, "JSESSIONID=9C827DD791A2E7E8875A0881A05A7DDB");
    assert_eq!(only(decode(&reencoded)).path(), None);
}

#[test]
fn roundtrip_big_ip_cookies() {
    let name = "BIGipServerSome.POOL";
    for value in BIG_IP_VALUES {
        let name_and_value = format!("{}={}", name, value);
        let header = format!("{}; path=/", name_and_value);

        let c = only(decode(&header));
        assert_eq!(c.name_value(), (name, *value));
        assert_eq!(c.path(), Some("/"));

        let reencoded = encode(vec![c]);
        assert!(
            reencoded.contains(&name_and_value),
            "expected {:?} to contain {:?}", reencoded, name_and_value
        );

        let c = only(decode(&reencoded));
        assert_eq!(c.name_value(), (name, *value));
        assert_eq!(c.path(), Some("/"));
    }
}

#[test]
fn slash_and_equals_quote_only_outside_values() {
    let value = "ISmVAfSbreVYuDPvGBi+wqMsPlQd8VcKzbdXs/X5bNvpumFqJFovxNX9bfOHFIG/QmaAJikiISaYbD4=";
    let c = Cookie::build("lb", value).path(value).finish().unwrap();
    assert_eq!(encode(vec![c]), format!("lb={}; $path=\"{}\"", value, value));
}

#[test]
fn roundtrip_is_exact_without_quoting_or_default_path() {
    let original: CookieSet<'static> = vec![
        Cookie::build("a", "1").path("/a").domain("example.com").finish().unwrap(),
        Cookie::build("b", "x+y").path("/a/b").finish().unwrap(),
        Cookie::new("c", "").unwrap(),
        Cookie::build("d", "4").domain("example.org").finish().unwrap(),
    ].into_iter().collect();

    let header = encode(original.clone());
    let decoded = decode(&header);
    assert_eq!(decoded, original);
}

#[test]
fn roundtrip_quoted_values() {
    let value = r#"a "quoted"; \value\ (with) {specials}"#;
    let c = Cookie::build("q", value).domain("a b").finish().unwrap();
    let header = encode(vec![c]);

    let c = only(decode(&header));
    assert_eq!(c.value(), value);
    assert_eq!(c.domain(), Some("a b"));
}

#[test]
fn roundtrip_version_one_cookies() {
    let original: CookieSet<'static> = vec![
        Cookie::build("a", "1").path("/a").version(1).ports([80, 8080]).finish().unwrap(),
        Cookie::build("b", "2").version(1).finish().unwrap(),
    ].into_iter().collect();

    let header = encode(original.clone());
    assert_eq!(header, r#"$Version=1; a=1; $path="/a"; $Port="80,8080"; $Version=1; b=2"#);

    let decoded = decode(&header);
    assert_eq!(decoded, original);
    for (decoded, original) in decoded.iter().zip(original.iter()) {
        assert_eq!(decoded.version(), 1);
        assert_eq!(decoded.ports(), original.ports());
    }
}

#[test]
fn multi_cookie_splitting() {
    let cookies: Vec<_> = decode("a=1; b=2").into_iter().collect();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0].name_value(), ("a", "1"));
    assert_eq!(cookies[1].name_value(), ("b", "2"));
    assert!(cookies.iter().all(|c| c.path().is_none() && c.domain().is_none()));
}

#[test]
fn encoding_ignores_insertion_order() {
    let cookies = vec![
        Cookie::build("session", "abc").path("/app").finish().unwrap(),
        Cookie::new("theme", "dark mode").unwrap(),
        Cookie::build("lang", "en").path("/").domain("example.com").finish().unwrap(),
        Cookie::new("a", "z").unwrap(),
    ];

    let forward = encode(cookies.clone());
    let backward = encode(cookies.into_iter().rev());
    assert_eq!(forward, backward);
    assert_eq!(
        forward,
        r#"session=abc; $path="/app"; lang=en; $path="/"; $Domain=example.com; a=z; theme="dark mode""#
    );
}

#[test]
fn empty_encoder() {
    assert_eq!(encode(Vec::new()), "");
    assert_eq!(encode(decode("; path=/")), "");
}
