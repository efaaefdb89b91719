use super::*;

// 2021-01-01T00:00:00+0000
const BASE: i64 = 1_609_459_200;

fn test_parser() -> StateParser {
    StateParser::new(BASE)
}

// parse

#[test]
fn test_data_offset_from_path_basename() {
    let parser = test_parser();
    let input = "data:/mnt/data/.blkcapt/d9c1e347/2021-01-01T00-01-00+0000";
    let state = parser.parse(input).unwrap();

    assert_eq!(state.data, vec![60]);
    assert!(state.backupbtr.is_empty());
    assert!(state.backuprst.is_empty());
}

#[test]
fn test_backupbtr_strips_extension() {
    let parser = test_parser();
    let input = "backupbtr:/mnt/backup/.blkcapt/d9c1e347/2021-01-01T00-02-00+0000.snapshot";
    let state = parser.parse(input).unwrap();

    assert_eq!(state.backupbtr, vec![120]);
}

#[test]
fn test_backuprst_strips_marker_by_offset() {
    let parser = test_parser();
    let input = "backuprst:ts=2021-01-01T00-03-00+0000";
    let state = parser.parse(input).unwrap();

    assert_eq!(state.backuprst, vec![180]);
}

#[test]
fn test_unrecognized_tag_is_skipped() {
    let parser = test_parser();
    let input = "other:foo\ndata:/pool/.blkcapt/a/2021-01-01T00-01-00+0000\nhost:xyz";
    let state = parser.parse(input).unwrap();

    assert_eq!(state.data, vec![60]);
    assert!(state.backupbtr.is_empty());
    assert!(state.backuprst.is_empty());
}

#[test]
fn test_line_without_colon_is_skipped() {
    let parser = test_parser();
    let state = parser.parse("no delimiter here\n\n").unwrap();

    assert_eq!(state, SnapshotState::default());
}

#[test]
fn test_extra_colons_stay_in_value() {
    let parser = test_parser();
    let input = "data:/mnt/da:ta/.blkcapt/a/2021-01-01T00-01-00+0000";
    let state = parser.parse(input).unwrap();

    assert_eq!(state.data, vec![60]);
}

#[test]
fn test_line_order_preserved_per_backend() {
    let parser = test_parser();
    let input = "data:/p/.blkcapt/a/2021-01-01T00-01-00+0000\n\
                 backuprst:ts=2021-01-01T00-00-30+0000\n\
                 data:/p/.blkcapt/a/2021-01-01T00-00-20+0000\n\
                 data:/p/.blkcapt/a/2021-01-01T00-00-40+0000";
    let state = parser.parse(input).unwrap();

    // no sorting: offsets appear in source line order
    assert_eq!(state.data, vec![60, 20, 40]);
    assert_eq!(state.backuprst, vec![30]);
}

#[test]
fn test_timezone_offset_applied() {
    let parser = test_parser();
    // 01:00 at +0100 is the base instant itself
    let input = "data:/p/.blkcapt/a/2021-01-01T01-00-00+0100";
    let state = parser.parse(input).unwrap();

    assert_eq!(state.data, vec![0]);
}

#[test]
fn test_malformed_timestamp_is_error() {
    let parser = test_parser();
    let input = "data:/p/.blkcapt/a/not-a-timestamp";
    let result = parser.parse(input);

    assert!(matches!(
        result,
        Err(ParseError::InvalidTimestamp { line_number: 1, .. })
    ));
}

#[test]
fn test_short_backuprst_value_is_error() {
    let parser = test_parser();
    let result = parser.parse("backuprst:ts");

    assert!(matches!(
        result,
        Err(ParseError::InvalidIdentifier { line_number: 1, .. })
    ));
}

#[test]
fn test_error_reports_line_number() {
    let parser = test_parser();
    let input = "data:/p/.blkcapt/a/2021-01-01T00-01-00+0000\ndata:/p/.blkcapt/a/garbage";
    let result = parser.parse(input);

    assert!(matches!(
        result,
        Err(ParseError::InvalidTimestamp { line_number: 2, .. })
    ));
}

// parse_stamp

#[test]
fn test_parse_stamp_epoch_seconds() {
    assert_eq!(parse_stamp("2021-01-01T00-00-00+0000"), Some(BASE));
    assert_eq!(parse_stamp("2021-01-01T00-01-30+0000"), Some(BASE + 90));
}

#[test]
fn test_parse_stamp_rejects_colon_time() {
    // wire format uses hyphens in the time portion
    assert_eq!(parse_stamp("2021-01-01T00:01:00+0000"), None);
}
