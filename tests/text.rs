use appvdf::text::{self, DuplicateKeyMode, TextOptions};
use appvdf::{ErrorKind, Value};

#[test]
fn test_parse_manifest() {
    let data = include_bytes!("fixtures/steam/steamapps/appmanifest_4000.acf");
    let value = text::parse(&data[..]).unwrap();
    assert_eq!(
        value.pointer(&["AppState", "name"]),
        Some(&Value::String(String::from("Garry's Mod")))
    );
    assert_eq!(
        value.pointer(&["AppState", "InstalledDepots", "4002", "size"]),
        Some(&Value::String(String::from("306009013")))
    );
}

#[test]
fn test_parse_preserves_order() {
    let data = include_bytes!("fixtures/steam/config/loginusers.vdf");
    let value = text::parse(&data[..]).unwrap();
    let users = value.pointer(&["users"]).and_then(|x| x.as_object()).unwrap();
    assert_eq!(
        users.keys().collect::<Vec<_>>(),
        vec!["76561197960287930", "76561198000000000"]
    );
}

#[test]
fn test_valve_escapes_and_conditionals() {
    let data = br#"
    "lang"
    {
        "Tokens"
        {
            "quote"     "say \"hi\""     [$WIN32]
            "path"      "C:\\Steam"
            // commented "out" "entry"
            "tab"       "a\tb"
        }
    }
    "#;

    let value = text::parse(&data[..]).unwrap();
    let get = |key: &str| value.pointer(&["lang", "Tokens", key]).cloned();
    assert_eq!(get("quote"), Some(Value::String(String::from("say \"hi\""))));
    assert_eq!(get("path"), Some(Value::String(String::from("C:\\Steam"))));
    assert_eq!(get("tab"), Some(Value::String(String::from("a\tb"))));
    assert_eq!(get("commented"), None);
}

#[test]
fn test_duplicate_key_modes() {
    let data = b"launch { 0 { exe a } } launch { 1 { exe b } }";

    let merged = text::parse(data).unwrap();
    let launch = merged.pointer(&["launch"]).and_then(|x| x.as_object()).unwrap();
    assert_eq!(launch.len(), 2);

    let overwritten = TextOptions::new()
        .duplicate_keys(DuplicateKeyMode::Overwrite)
        .parse(data)
        .unwrap();
    let launch = overwritten
        .pointer(&["launch"])
        .and_then(|x| x.as_object())
        .unwrap();
    assert_eq!(launch.keys().collect::<Vec<_>>(), vec!["1"]);

    let collected = text::parse_with(
        data,
        TextOptions::new().duplicate_keys(DuplicateKeyMode::Collect),
    )
    .unwrap();
    match collected.pointer(&["launch"]) {
        Some(Value::List(values)) => assert_eq!(values.len(), 2),
        x => panic!("unexpected value: {:?}", x),
    }
}

#[test]
fn test_errors_are_malformed() {
    let cases: [&[u8]; 4] = [b"\"a\" {", b"}", b"a \"b", b"a"];
    for data in cases {
        let err = text::parse(data).unwrap_err();
        assert!(err.kind().is_malformed(), "{:?}", err);
        assert!(!matches!(err.kind(), ErrorKind::Io(_)));
    }
}
