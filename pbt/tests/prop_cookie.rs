//! Cookie / Authorization のプロパティテスト

use proptest::prelude::*;
use shiguredo_http_negotiation::auth::Authorization;
use shiguredo_http_negotiation::cookie::Cookies;

proptest! {
    #[test]
    fn cookies_display_roundtrip(
        pairs in proptest::collection::vec(("[A-Za-z0-9_-]{1,8}", "[A-Za-z0-9!#$%&'()*+./:<=>?@^_`{|}~-]{0,12}"), 0..8)
    ) {
        let mut cookies = Cookies::new();
        for (name, value) in &pairs {
            cookies.insert(name, value).unwrap();
        }
        prop_assert_eq!(Cookies::parse(&cookies.to_string()).unwrap(), cookies.clone());

        // 最後の値が残る
        for (name, _) in &pairs {
            let last = pairs.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.as_str());
            prop_assert_eq!(cookies.get(name), last);
        }
    }
}

proptest! {
    #[test]
    fn cookies_no_panic(input in ".{0,64}") {
        let _ = Cookies::parse(&input);
    }
}

proptest! {
    #[test]
    fn basic_credentials_roundtrip(username in "[^:]{0,16}", password in "\\PC{0,16}") {
        let auth = Authorization::basic_credentials(&username, &password);
        let parsed = Authorization::parse(&auth.to_string()).unwrap();
        prop_assert_eq!(parsed.scheme(), "basic");

        let basic = parsed.basic().unwrap();
        prop_assert_eq!(basic.username(), username.as_str());
        prop_assert_eq!(basic.password(), password.as_str());
    }
}

proptest! {
    #[test]
    fn authorization_split(scheme in "[A-Za-z]{1,10}", credentials in "[!-~]([ !-~]{0,20}[!-~])?", ws in "[ \t]{1,3}") {
        let value = format!("{}{}{}", scheme, ws, credentials);
        let auth = Authorization::parse(&value).unwrap();
        prop_assert_eq!(auth.scheme(), scheme.to_ascii_lowercase());
        prop_assert_eq!(auth.credentials(), credentials.as_str());
    }
}

proptest! {
    #[test]
    fn authorization_no_panic(input in ".{0,64}") {
        if let Ok(auth) = Authorization::parse(&input) {
            let _ = auth.basic();
            let _ = auth.bearer();
        }
    }
}
