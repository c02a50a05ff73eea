//! Host のプロパティテスト

use proptest::prelude::*;
use shiguredo_http_negotiation::host::{Host, parse_host};
use std::net::{Ipv4Addr, Ipv6Addr};

proptest! {
    #[test]
    fn host_reg_name_with_port(name in "[a-z][a-z0-9-]{0,10}(\\.[a-z]{2,5}){0,2}", port in any::<u16>()) {
        let value = format!("{}:{}", name, port);
        prop_assert_eq!(parse_host(&value).unwrap(), (name.as_str(), Some(port)));

        let host = Host::parse(&value).unwrap();
        prop_assert_eq!(host.to_string(), value);
    }
}

proptest! {
    #[test]
    fn host_ipv4(addr in any::<[u8; 4]>(), port in proptest::option::of(any::<u16>())) {
        let ip = Ipv4Addr::from(addr).to_string();
        let value = match port {
            Some(port) => format!("{}:{}", ip, port),
            None => ip.clone(),
        };
        prop_assert_eq!(parse_host(&value).unwrap(), (ip.as_str(), port));
        prop_assert!(!Host::parse(&value).unwrap().is_ipv6());
    }
}

// IPv6 リテラルは最後の `]:` で分割する
proptest! {
    #[test]
    fn host_ipv6(segments in any::<[u16; 8]>(), port in proptest::option::of(any::<u16>())) {
        let literal = format!("[{}]", Ipv6Addr::from(segments));
        let value = match port {
            Some(port) => format!("{}:{}", literal, port),
            None => literal.clone(),
        };
        prop_assert_eq!(parse_host(&value).unwrap(), (literal.as_str(), port));

        let host = Host::parse(&value).unwrap();
        prop_assert!(host.is_ipv6());
        prop_assert_eq!(host.to_string(), value);
    }
}

proptest! {
    #[test]
    fn host_no_panic(input in ".{0,64}") {
        let _ = parse_host(&input);
        let _ = Host::parse(&input);
    }
}
