#![no_main]

use cookie_codec::{decode, CookieEncoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let cookies = decode(data);
    let count = cookies.len();
    let header = cookies.into_iter().collect::<CookieEncoder>().encode();

    // Re-decoding an encoded header never invents cookies.
    assert!(decode(&header).len() <= count);
});
