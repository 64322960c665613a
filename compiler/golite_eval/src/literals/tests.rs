use super::*;
use golite_value::EvalErrorKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn lit(kind: LitKind, text: &str) -> Value {
    match decode(kind, text) {
        Ok(v) => v,
        Err(e) => panic!("{text}: {e}"),
    }
}

#[test]
fn integer_bases() {
    assert_eq!(lit(LitKind::Int, "42"), Value::int(42));
    assert_eq!(lit(LitKind::Int, "0x_FF"), Value::int(255));
    assert_eq!(lit(LitKind::Int, "0o17"), Value::int(15));
    assert_eq!(lit(LitKind::Int, "017"), Value::int(15));
    assert_eq!(lit(LitKind::Int, "0b1010"), Value::int(10));
    assert_eq!(lit(LitKind::Int, "1_000_000"), Value::int(1_000_000));
    assert_eq!(lit(LitKind::Int, "0"), Value::int(0));
}

#[test]
fn malformed_integers_fail() {
    for text in ["09", "0x", "9223372036854775808"] {
        assert!(
            matches!(
                decode(LitKind::Int, text).map_err(|e| e.kind),
                Err(EvalErrorKind::LiteralParse { .. })
            ),
            "{text}"
        );
    }
    assert_eq!(
        lit(LitKind::Int, "9223372036854775807"),
        Value::int(i64::MAX)
    );
}

#[test]
fn negated_integers_reach_the_minimum() {
    assert_eq!(
        decode_negated_int("9223372036854775808"),
        Ok(Value::int(i64::MIN))
    );
    assert_eq!(decode_negated_int("0x10"), Ok(Value::int(-16)));
    assert!(matches!(
        decode_negated_int("9223372036854775809").map_err(|e| e.kind),
        Err(EvalErrorKind::LiteralParse { .. })
    ));
}

proptest! {
    #[test]
    fn negated_decimal_matches_i64(n in i64::MIN..=0) {
        let text = n.unsigned_abs().to_string();
        prop_assert_eq!(decode_negated_int(&text), Ok(Value::int(n)));
    }
}

#[test]
fn floats_and_imaginaries() {
    assert_eq!(lit(LitKind::Float, "1.5"), Value::float(1.5));
    assert_eq!(lit(LitKind::Float, ".25"), Value::float(0.25));
    assert_eq!(lit(LitKind::Float, "1e3"), Value::float(1000.0));
    assert_eq!(lit(LitKind::Float, "1_0.5"), Value::float(10.5));
    assert_eq!(lit(LitKind::Imag, "2i"), Value::complex(0.0, 2.0));
    assert_eq!(lit(LitKind::Imag, "012i"), Value::complex(0.0, 12.0));
    assert_eq!(lit(LitKind::Imag, "1.5i"), Value::complex(0.0, 1.5));
    assert!(decode(LitKind::Float, "1e999").is_err());
}

#[test]
fn runes() {
    assert_eq!(lit(LitKind::Char, "'a'"), Value::rune('a'));
    assert_eq!(lit(LitKind::Char, "'é'"), Value::rune('é'));
    assert_eq!(lit(LitKind::Char, r"'\n'"), Value::rune('\n'));
    assert_eq!(lit(LitKind::Char, r"'\''"), Value::rune('\''));
    assert_eq!(lit(LitKind::Char, r"'\x41'"), Value::rune('A'));
    assert_eq!(lit(LitKind::Char, r"'\101'"), Value::rune('A'));
    assert_eq!(lit(LitKind::Char, r"'é'"), Value::rune('é'));
    assert!(decode(LitKind::Char, "''").is_err());
    assert!(decode(LitKind::Char, "'ab'").is_err());
    assert!(decode(LitKind::Char, r"'\q'").is_err());
}

#[test]
fn interpreted_strings() {
    assert_eq!(lit(LitKind::String, r#""plain""#), Value::string("plain"));
    assert_eq!(
        lit(LitKind::String, r#""a\tb\n\"q\"\\""#),
        Value::string("a\tb\n\"q\"\\")
    );
    assert_eq!(
        lit(LitKind::String, r#""\U0001F600é""#),
        Value::string("\u{1F600}é")
    );
    assert_eq!(
        lit(LitKind::String, r#""\xe6\x97\xa5""#),
        Value::string("日")
    );
    assert!(decode(LitKind::String, r#""\'""#).is_err());
    assert!(decode(LitKind::String, r#""\777""#).is_err());
}

#[test]
fn byte_escapes_are_kept_as_bytes() {
    let value = lit(LitKind::String, r#""\xff\303""#);
    assert_eq!(value.as_bytes(), Some(&[0xff, 0xc3][..]));
    assert_eq!(value.as_str(), None);
}

#[test]
fn raw_strings_drop_carriage_returns() {
    assert_eq!(
        lit(LitKind::String, "`a\\n\r\nb`"),
        Value::string("a\\n\nb")
    );
}
