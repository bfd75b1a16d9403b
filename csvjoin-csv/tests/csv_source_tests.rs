//! File-backed tests for `CsvSource`.

use csvjoin_csv::{CsvReadOptions, CsvSource, Row};
use csvjoin_result::{Error, Result as CsvJoinResult};
use csvjoin_test_utils::{init_tracing_for_tests, people_left, write_csv};

fn read_all<R>(source: &mut CsvSource<R>) -> Vec<(usize, Row)>
where
    R: std::io::BufRead + std::io::Seek,
{
    source
        .rows()
        .expect("rewind")
        .collect::<CsvJoinResult<Vec<_>>>()
        .expect("read rows")
}

#[test]
fn open_reads_header_and_rows() {
    init_tracing_for_tests();
    let file = people_left();
    let mut source = CsvSource::open(file.path(), CsvReadOptions::default()).expect("open");

    assert_eq!(source.header().fields(), ["Age", "Gender", "ID"]);
    let rows = read_all(&mut source);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2], (3, Row::from_iter(["3", "Female", "3"])));
}

#[test]
fn repeated_scans_are_identical() {
    let file = people_left();
    let mut source = CsvSource::open(file.path(), CsvReadOptions::default()).expect("open");

    let first = read_all(&mut source);
    for _ in 0..3 {
        assert_eq!(read_all(&mut source), first);
    }
}

#[test]
fn open_missing_path_is_file_not_found() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let missing = dir.path().join("nope.csv");

    let err = CsvSource::open(&missing, CsvReadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(ref p) if p == &missing));
    assert!(err.is_usage_error());
}

#[test]
fn open_directory_is_file_not_found() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = CsvSource::open(dir.path(), CsvReadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn semicolon_delimited_file() {
    let file = write_csv(&["id;name", "1;Ada", "2;Grace"]);
    let options = CsvReadOptions::default().with_delimiter(';');
    let mut source = CsvSource::open(file.path(), options).expect("open");

    assert_eq!(source.header().fields(), ["id", "name"]);
    let rows = read_all(&mut source);
    assert_eq!(rows[1].1.get(1), Some("Grace"));
}

#[test]
fn source_name_is_the_path() {
    let file = people_left();
    let source = CsvSource::open(file.path(), CsvReadOptions::default()).expect("open");
    assert_eq!(source.name(), file.path().display().to_string());
}
