//! Integration tests for statement classification.

use mssql_mcp_server::models::StatementKind;
use mssql_mcp_server::tools::classifier::{classify, strip_comments};
use rand::Rng;
use rand::seq::SliceRandom;

const FRAGMENTS: &[&str] = &[
    "SELECT", "select", "UPDATE", "INSERT", "DELETE", "EXEC", "WITH", "1", "x", "FROM", "t",
    " ", "\n", "\t", "/*", "*/", "--", "/* c */", "-- c\n", "'", ";",
];

fn random_statement(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(0..12);
    (0..len).map(|_| *FRAGMENTS.choose(rng).unwrap()).collect()
}

#[test]
fn test_examples() {
    assert_eq!(classify("/* hi */ select 1"), StatementKind::Read);
    assert_eq!(classify("-- x\nUPDATE t SET a=1"), StatementKind::Write);
    assert_eq!(classify("-- SELECT\nUPDATE t SET x=1"), StatementKind::Write);
    assert_eq!(classify("/* c */ SELECT * FROM t"), StatementKind::Read);
    assert_eq!(classify(""), StatementKind::Write);
}

#[test]
fn test_nested_looking_block_comments() {
    // The first */ closes the comment; the rest is statement text
    assert_eq!(classify("/* a /* b */ SELECT 1"), StatementKind::Read);
    assert_eq!(classify("/* a /* b */ c */ SELECT 1"), StatementKind::Write);
}

#[test]
fn test_line_comment_does_not_hide_next_line() {
    assert_eq!(classify("-- SELECT\nDELETE FROM t"), StatementKind::Write);
    assert_eq!(classify("-- DELETE\r\nSELECT 1"), StatementKind::Read);
}

#[test]
fn fuzz_reclassifying_stripped_text_is_stable() {
    let mut rng = rand::thread_rng();

    for _ in 0..5000 {
        let sql = random_statement(&mut rng);
        let stripped = strip_comments(&sql);
        assert_eq!(
            classify(&stripped),
            classify(&sql),
            "classification changed for {:?} -> {:?}",
            sql,
            stripped
        );
    }
}

#[test]
fn fuzz_classify_never_panics_on_arbitrary_text() {
    let mut rng = rand::thread_rng();

    for _ in 0..2000 {
        let len = rng.gen_range(0..64);
        let sql: String = (0..len)
            .map(|_| char::from_u32(rng.gen_range(0..0x3000)).unwrap_or('?'))
            .collect();
        let _ = classify(&sql);
    }
}
