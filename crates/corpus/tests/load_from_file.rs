use std::io::Write;

use corpus::{Corpus, CorpusError};

#[test]
fn loads_corpus_from_disk_and_searches_it() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "Enter the ghost of Hamlet's father.").expect("write");
    writeln!(file, "Exit HAMLET, pursued by doubt.").expect("write");

    let corpus = Corpus::load(file.path()).expect("load");
    assert!(!corpus.is_empty());
    assert_eq!(corpus.count_matches("hamlet").expect("count"), 2);

    let results = corpus.search("hamlet", 20).expect("search");
    assert_eq!(results.len(), 2);
    assert!(results[1].contains("HAMLET"));
}

#[test]
fn invalid_utf8_is_loaded_lossily() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"caf\xff drunk").expect("write");

    let corpus = Corpus::load(file.path()).expect("load");
    assert_eq!(corpus.count_matches("drunk").expect("count"), 1);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("completeworks.txt");

    let err = Corpus::load(&path).expect_err("missing file");
    assert!(matches!(err, CorpusError::Io { .. }));
    assert!(err.to_string().contains("completeworks.txt"));
}
