use super::*;

#[test]
fn content_range_with_span_parses_total() {
    assert_eq!(parse_content_range_count("0-24/3573"), Some(3573));
}

#[test]
fn content_range_count_only_parses_total() {
    assert_eq!(parse_content_range_count("*/42"), Some(42));
    assert_eq!(parse_content_range_count("*/0"), Some(0));
}

#[test]
fn content_range_unknown_total_is_none() {
    assert_eq!(parse_content_range_count("0-0/*"), None);
}

#[test]
fn content_range_garbage_is_none() {
    assert_eq!(parse_content_range_count(""), None);
    assert_eq!(parse_content_range_count("bytes"), None);
    assert_eq!(parse_content_range_count("0-24/-3"), None);
}
