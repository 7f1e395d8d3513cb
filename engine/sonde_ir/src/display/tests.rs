use super::*;
use pretty_assertions::assert_eq;

#[test]
fn byte_encodings() {
    let hello = b"hello";
    assert_eq!(BytesEncoding::Hex.encode(hello), "68656c6c6f");
    assert_eq!(BytesEncoding::Utf8.encode(hello), "hello");
    assert_eq!(BytesEncoding::Base64.encode(hello), "aGVsbG8=");
    assert_eq!(BytesEncoding::Array.encode(hello), "[104,101,108,108,111]");
}

#[test]
fn byte_decodings() {
    assert_eq!(BytesEncoding::Hex.decode("0x6869"), Ok(b"hi".to_vec()));
    assert_eq!(BytesEncoding::Base64.decode("aGk="), Ok(b"hi".to_vec()));
    assert_eq!(BytesEncoding::Array.decode("[104, 105]"), Ok(b"hi".to_vec()));
    assert!(BytesEncoding::Hex.decode("zz").is_err());
    assert!(BytesEncoding::Array.decode("[300]").is_err());
}

#[test]
fn names_parse_case_insensitively() {
    assert_eq!("JSON".parse::<DisplayMode>(), Ok(DisplayMode::Json));
    assert_eq!("utf-8".parse::<BytesEncoding>(), Ok(BytesEncoding::Utf8));
    assert!("fancy".parse::<DisplayMode>().is_err());
}

#[test]
fn http_links_only() {
    assert_eq!(
        http_link("https://dashboard.internetcomputer.org"),
        Some("https://dashboard.internetcomputer.org".to_owned())
    );
    assert_eq!(http_link("ftp://example.com/file"), None);
    assert_eq!(http_link("just words"), None);
}

#[test]
fn text_printer_indents_nested_nodes() {
    let tree = Rendered::new(Body::Nested(vec![
        Rendered::new(Body::Text("Alice".to_owned())).labeled(Some("name".to_owned())),
        Rendered::new(Body::Nested(vec![
            Rendered::new(Body::Number {
                text: "1".to_owned(),
                relative: None,
            }),
            Rendered::new(Body::Number {
                text: "2".to_owned(),
                relative: None,
            }),
        ]))
        .labeled(Some("ids".to_owned()))
        .counted(Some(2)),
        Rendered::new(Body::Heading {
            name: "err".to_owned(),
            inner: None,
        })
        .labeled(Some("status".to_owned())),
    ]));

    assert_eq!(
        tree.to_text(),
        "name: Alice\nids (2)\n  1\n  2\nstatus: err"
    );
}

#[test]
fn raw_nodes_show_length() {
    assert_eq!(Rendered::raw(&[0x44, 0x49]).to_text(), "0x4449 (2 bytes)");
}

#[test]
fn text_leaves() {
    assert_eq!(Rendered::text("").body, Body::Empty);
    let plain = Rendered::text("héllo");
    assert_eq!(plain.body, Body::Text("héllo".to_owned()));
    assert_eq!(plain.count, Some(5));
    assert_eq!(
        Rendered::text("http://example.com").body,
        Body::Link("http://example.com".to_owned())
    );
}
