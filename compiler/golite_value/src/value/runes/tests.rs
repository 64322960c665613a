use super::*;
use pretty_assertions::assert_eq;

#[test]
fn offsets_count_bytes() {
    assert_eq!(
        rune_indices("héllo".as_bytes()),
        vec![(0, 'h'), (1, 'é'), (3, 'l'), (4, 'l'), (5, 'o')]
    );
}

#[test]
fn invalid_bytes_decode_one_at_a_time() {
    assert_eq!(
        rune_indices(b"a\xc3\xffb"),
        vec![
            (0, 'a'),
            (1, char::REPLACEMENT_CHARACTER),
            (2, char::REPLACEMENT_CHARACTER),
            (3, 'b'),
        ]
    );
}
