//! Tests for coordinate and move notation.

use ayu_server::{Coord, Move};

#[test]
fn test_coord_notation_corners() {
    assert_eq!(Coord::new(0, 0).notation(11), "A11");
    assert_eq!(Coord::new(10, 0).notation(11), "A1");
    assert_eq!(Coord::new(10, 10).notation(11), "K1");
    assert_eq!(Coord::new(0, 10).notation(11), "K11");
}

#[test]
fn test_coord_notation_depends_on_size() {
    assert_eq!(Coord::new(0, 1).notation(3), "B3");
    assert_eq!(Coord::new(0, 1).notation(19), "B19");
}

#[test]
fn test_coord_parse() {
    assert_eq!(Coord::parse("A11", 11).expect("A11 parses"), Coord::new(0, 0));
    assert_eq!(Coord::parse("D9", 11).expect("D9 parses"), Coord::new(2, 3));
    assert_eq!(Coord::parse("S1", 19).expect("S1 parses"), Coord::new(18, 18));
}

#[test]
fn test_coord_parse_round_trips_every_square() {
    for row in 0..11 {
        for col in 0..11 {
            let coord = Coord::new(row, col);
            let text = coord.notation(11);
            assert_eq!(Coord::parse(&text, 11).expect("notation parses"), coord);
        }
    }
}

#[test]
fn test_coord_parse_is_not_range_checked() {
    assert_eq!(Coord::parse("A12", 11).expect("A12 parses"), Coord::new(-1, 0));
    assert_eq!(Coord::parse("Z1", 11).expect("Z1 parses"), Coord::new(10, 25));
}

#[test]
fn test_coord_parse_rejects_malformed() {
    for text in ["", "A", "a1", "1A", "A0", "A01", "AA1", "A1x", "A-1", " A1", "Ä1"] {
        assert!(Coord::parse(text, 11).is_err(), "{:?} should not parse", text);
    }
}

#[test]
fn test_move_notation() {
    let mv = Move::new(Coord::new(2, 3), Coord::new(2, 4));
    assert_eq!(mv.notation(11), "D9-E9");
}

#[test]
fn test_move_parse() {
    let mv = Move::parse("E10-F10", 11).expect("move parses");
    assert_eq!(mv, Move::new(Coord::new(1, 4), Coord::new(1, 5)));
}

#[test]
fn test_move_parse_rejects_malformed() {
    for text in ["D9E9", "D9-", "-E9", "D9-E9-F9", "d9-e9", "D9 - E9"] {
        assert!(Move::parse(text, 11).is_err(), "{:?} should not parse", text);
    }
}

#[test]
fn test_parse_error_names_input() {
    let err = Move::parse("D9E9", 11).expect_err("missing separator");
    assert!(err.to_string().contains("D9E9"));
}

#[test]
fn test_coord_round_trip_smallest_and_largest_boards() {
    for size in [3usize, 19] {
        for row in 0..size as i32 {
            for col in 0..size as i32 {
                let coord = Coord::new(row, col);
                let text = coord.notation(size);
                assert_eq!(Coord::parse(&text, size), Ok(coord), "{} on size {}", text, size);
            }
        }
    }
    assert_eq!(Coord::new(0, 18).notation(19), "S19");
    assert_eq!(Coord::new(2, 0).notation(3), "A1");
}

#[test]
fn test_wire_form_is_nested_pairs() {
    let mv = Move::new(Coord::new(2, 3), Coord::new(2, 4));
    assert_eq!(
        serde_json::to_value(mv).expect("serializes"),
        serde_json::json!([[2, 3], [2, 4]])
    );
    let parsed: Move = serde_json::from_str("[[1,4],[1,5]]").expect("deserializes");
    assert_eq!(parsed, Move::new(Coord::new(1, 4), Coord::new(1, 5)));
}
