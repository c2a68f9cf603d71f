//! RFC 8949 Appendix A examples.

use cborg::{bytes::from_hex, DecodeOptions, EncodeOptions, ErrorKind, Tag, Value, ValueKind};

fn int(v: i128) -> Value {
    Value::from(v)
}

fn text(s: &str) -> Value {
    Value::from(s)
}

fn arr<const N: usize>(items: [Value; N]) -> Value {
    Value::Array(items.into())
}

fn obj<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
}

fn tagged(num: u64, content: Value) -> Value {
    Value::from(Tag::new(num, content))
}

fn options() -> DecodeOptions {
    [0, 1, 23, 24, 32]
        .into_iter()
        .fold(DecodeOptions::default(), |options, num| {
            options.with_tag(num, move |content| Ok(tagged(num, content.decode()?)))
        })
}

fn one_to_25() -> Value {
    (1..=25).map(Value::from).collect()
}

fn nested() -> Value {
    arr([int(1), arr([int(2), int(3)]), arr([int(4), int(5)])])
}

/// Items whose encoding is the shortest form, so they re-encode to the same
/// bytes.
fn canonical() -> Vec<(&'static str, Value)> {
    vec![
        ("00", int(0)),
        ("01", int(1)),
        ("0a", int(10)),
        ("17", int(23)),
        ("1818", int(24)),
        ("1819", int(25)),
        ("1864", int(100)),
        ("1903e8", int(1000)),
        ("1a000f4240", int(1_000_000)),
        ("1b000000e8d4a51000", int(1_000_000_000_000)),
        ("1bffffffffffffffff", int(18_446_744_073_709_551_615)),
        ("3bffffffffffffffff", int(-18_446_744_073_709_551_616)),
        ("20", int(-1)),
        ("29", int(-10)),
        ("3863", int(-100)),
        ("3903e7", int(-1000)),
        ("f90000", Value::from(0.0)),
        ("f98000", Value::from(-0.0)),
        ("f93c00", Value::from(1.0)),
        ("fb3ff199999999999a", Value::from(1.1)),
        ("f93e00", Value::from(1.5)),
        ("f97bff", Value::from(65504.0)),
        ("fa47c35000", Value::from(100_000.0)),
        ("fa7f7fffff", Value::from(3.402_823_466_385_288_6e38)),
        ("fb7e37e43c8800759c", Value::from(1.0e300)),
        ("f90001", Value::from(5.960_464_477_539_063e-8)),
        ("f90400", Value::from(0.000_061_035_156_25)),
        ("f9c400", Value::from(-4.0)),
        ("fbc010666666666666", Value::from(-4.1)),
        ("f97c00", Value::from(f64::INFINITY)),
        ("f97e00", Value::from(f64::NAN)),
        ("f9fc00", Value::from(f64::NEG_INFINITY)),
        ("f4", Value::Bool(false)),
        ("f5", Value::Bool(true)),
        ("f6", Value::Null),
        ("f7", Value::Undefined),
        (
            "c074323031332d30332d32315432303a30343a30305a",
            tagged(0, text("2013-03-21T20:04:00Z")),
        ),
        ("c11a514b67b0", tagged(1, int(1_363_896_240))),
        ("c1fb41d452d9ec200000", tagged(1, Value::from(1_363_896_240.5))),
        ("d74401020304", tagged(23, Value::from(vec![1u8, 2, 3, 4]))),
        ("d818456449455446", tagged(24, Value::from(b"dIETF".to_vec()))),
        (
            "d82076687474703a2f2f7777772e6578616d706c652e636f6d",
            tagged(32, text("http://www.example.com")),
        ),
        ("40", Value::from(Vec::<u8>::new())),
        ("4401020304", Value::from(vec![1u8, 2, 3, 4])),
        ("60", text("")),
        ("6161", text("a")),
        ("6449455446", text("IETF")),
        ("62225c", text("\"\\")),
        ("62c3bc", text("\u{00fc}")),
        ("63e6b0b4", text("\u{6c34}")),
        ("64f0908591", text("\u{10151}")),
        ("80", arr([])),
        ("83010203", arr([int(1), int(2), int(3)])),
        ("8301820203820405", nested()),
        (
            "98190102030405060708090a0b0c0d0e0f101112131415161718181819",
            one_to_25(),
        ),
        ("a0", obj([])),
        (
            "a26161016162820203",
            obj([("a", int(1)), ("b", arr([int(2), int(3)]))]),
        ),
        ("826161a161626163", arr([text("a"), obj([("b", text("c"))])])),
        (
            "a56161614161626142616361436164614461656145",
            obj([
                ("a", text("A")),
                ("b", text("B")),
                ("c", text("C")),
                ("d", text("D")),
                ("e", text("E")),
            ]),
        ),
    ]
}

/// Items which decode but are not written this way by the encoder.
fn decode_only() -> Vec<(&'static str, Value)> {
    vec![
        ("fa7f800000", Value::from(f64::INFINITY)),
        ("fa7fc00000", Value::from(f64::NAN)),
        ("faff800000", Value::from(f64::NEG_INFINITY)),
        ("fb7ff0000000000000", Value::from(f64::INFINITY)),
        ("fb7ff8000000000000", Value::from(f64::NAN)),
        ("fbfff0000000000000", Value::from(f64::NEG_INFINITY)),
        ("9fff", arr([])),
        ("9f018202039f0405ffff", nested()),
        ("9f01820203820405ff", nested()),
        ("83018202039f0405ff", nested()),
        ("83019f0203ff820405", nested()),
        (
            "9f0102030405060708090a0b0c0d0e0f101112131415161718181819ff",
            one_to_25(),
        ),
        (
            "bf61610161629f0203ffff",
            obj([("a", int(1)), ("b", arr([int(2), int(3)]))]),
        ),
        ("826161bf61626163ff", arr([text("a"), obj([("b", text("c"))])])),
        (
            "bf6346756ef563416d7421ff",
            obj([("Fun", Value::Bool(true)), ("Amt", int(-2))]),
        ),
    ]
}

#[test]
fn decode_and_reencode() {
    let options = options();
    for (hex, expected) in canonical() {
        let data = from_hex(hex).unwrap();
        let decoded = cborg::decode(&data, &options).unwrap_or_else(|e| panic!("{hex}: {e}"));
        assert_eq!(decoded, expected, "{hex}");
        assert_eq!(
            cborg::encode(&decoded, &EncodeOptions::default()).unwrap(),
            data,
            "{hex}"
        );
    }
}

#[test]
fn decode_non_canonical() {
    let options = options();
    for (hex, expected) in decode_only() {
        let data = from_hex(hex).unwrap();
        let decoded = cborg::decode(&data, &options).unwrap_or_else(|e| panic!("{hex}: {e}"));
        assert_eq!(decoded, expected, "{hex}");
    }
}

#[test]
fn strict_accepts_canonical_integers() {
    let options = DecodeOptions {
        strict: true,
        ..options()
    };
    for (hex, _) in canonical() {
        let data = from_hex(hex).unwrap();
        assert!(cborg::decode(&data, &options).is_ok(), "{hex}");
    }
}

#[test]
fn integer_keys_need_maps() {
    let data = from_hex("a201020304").unwrap();
    let err = cborg::decode(&data, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NonTextKey(ValueKind::Int));

    let options = DecodeOptions {
        use_maps: true,
        ..DecodeOptions::default()
    };
    assert_eq!(
        cborg::decode(&data, &options).unwrap(),
        Value::Map(vec![(int(1), int(2)), (int(3), int(4))])
    );
}

#[test]
fn unsupported_items() {
    let cases = [
        (
            "c249010000000000000000",
            ErrorKind::TagNotSupported(2),
        ),
        ("f0", ErrorKind::UnsupportedSimpleValue(16)),
        ("f8ff", ErrorKind::UnsupportedSimpleValue(255)),
        (
            "5f42010243030405ff",
            ErrorKind::UnsupportedIndefiniteString,
        ),
        (
            "7f657374726561646d696e67ff",
            ErrorKind::UnsupportedIndefiniteString,
        ),
    ];
    for (hex, kind) in cases {
        let data = from_hex(hex).unwrap();
        let err = cborg::decode(&data, &options()).unwrap_err();
        assert_eq!(err.kind(), &kind, "{hex}");
    }
}
