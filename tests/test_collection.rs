//! Tests for the .pwc -> .nvcx collection upgrade.

use yw_novx::collection::{upgrade_collection, CollectionError};
use yw_novx::xmlio;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_upgrade_v1_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let book = common::write_file(dir.path(), "part_one.yw7", common::sample_yw7());
    let manifest = common::sample_pwc_v1(&book);
    let source = common::write_file(dir.path(), "shelf.pwc", &manifest);
    let target = dir.path().join("shelf.nvcx");

    upgrade_collection(&source, &target).unwrap();

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(written.contains("<!DOCTYPE COLLECTION SYSTEM \"nvcx_1_0.dtd\">"));
    assert!(written.contains("collection.css"));

    let doc = xmlio::parse_document(&written).unwrap();
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "COLLECTION");
    assert_eq!(root.attribute("version"), Some("1.0"));

    // Top-level book, then the series with its nested book.
    let books: Vec<_> = root
        .children()
        .filter(|c| c.has_tag_name("BOOK"))
        .collect();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].attribute("id"), Some("bk1"));
    assert_eq!(
        xmlio::child_text(books[0], "Title").as_deref(),
        Some("Standalone")
    );
    let desc = xmlio::child(books[0], "Desc").unwrap();
    let paragraphs: Vec<_> = desc.children().filter(|c| c.has_tag_name("p")).collect();
    assert_eq!(paragraphs.len(), 2);

    let series = xmlio::child(root, "SERIES").unwrap();
    assert_eq!(series.attribute("id"), Some("sr2"));
    let nested = xmlio::child(series, "BOOK").unwrap();
    assert_eq!(nested.attribute("id"), Some("bk3"));

    // Book converted and the manifest points at the novx sibling.
    let recorded = xmlio::child_text(nested, "Path").unwrap();
    assert!(recorded.ends_with("part_one.novx"));
    assert!(dir.path().join("part_one.novx").is_file());
}

#[test]
fn test_upgrade_old_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let book = common::write_file(dir.path(), "part_one.yw7", common::sample_yw7());
    let manifest = common::sample_pwc_old(&book);
    let source = common::write_file(dir.path(), "shelf.pwc", &manifest);
    let target = dir.path().join("shelf.nvcx");

    upgrade_collection(&source, &target).unwrap();

    let written = std::fs::read_to_string(&target).unwrap();
    let doc = xmlio::parse_document(&written).unwrap();
    let root = doc.root_element();
    let series = xmlio::child(root, "SERIES").unwrap();
    assert_eq!(series.attribute("id"), Some("sr2"));
    assert_eq!(
        xmlio::child(series, "BOOK").unwrap().attribute("id"),
        Some("bk3")
    );
}

#[test]
fn test_existing_novx_is_not_reconverted() {
    let dir = tempfile::tempdir().unwrap();
    let book = common::write_file(dir.path(), "part_one.yw7", common::sample_yw7());
    let existing = common::write_file(dir.path(), "part_one.novx", "pre-existing");
    let source = common::write_file(dir.path(), "shelf.pwc", &common::sample_pwc_v1(&book));
    let target = dir.path().join("shelf.nvcx");

    upgrade_collection(&source, &target).unwrap();

    // The sibling already existed, so it must stay untouched.
    assert_eq!(std::fs::read_to_string(existing).unwrap(), "pre-existing");
}

#[test]
fn test_dangling_book_path_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = common::sample_pwc_v1(&dir.path().join("gone.yw7"));
    let source = common::write_file(dir.path(), "shelf.pwc", &manifest);
    let target = dir.path().join("shelf.nvcx");

    upgrade_collection(&source, &target).unwrap();

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(!written.contains("<Path>"));
}

#[test]
fn test_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "shelf.txt", "<collection version=\"1.0\"/>");
    let err = upgrade_collection(&source, &dir.path().join("shelf.nvcx")).unwrap_err();
    assert!(matches!(err, CollectionError::WrongExtension { .. }));
    assert!(err.to_string().contains(".pwc"));
}

#[test]
fn test_not_a_collection() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "shelf.pwc", "<library version=\"1.0\"/>");
    assert!(matches!(
        upgrade_collection(&source, &dir.path().join("shelf.nvcx")).unwrap_err(),
        CollectionError::NoCollection { .. }
    ));
}

#[test]
fn test_missing_version() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "shelf.pwc", "<collection/>");
    assert!(matches!(
        upgrade_collection(&source, &dir.path().join("shelf.nvcx")).unwrap_err(),
        CollectionError::NoVersion { .. }
    ));
}

#[test]
fn test_newer_plugin_version() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "shelf.pwc", "<collection version=\"2.0\"/>");
    assert!(matches!(
        upgrade_collection(&source, &dir.path().join("shelf.nvcx")).unwrap_err(),
        CollectionError::NewerVersion
    ));
}
