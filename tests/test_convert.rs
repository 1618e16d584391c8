//! End-to-end conversion tests through the orchestration layer.

use yw_novx::cli::run_convert;
use yw_novx::utils::fsio::backup_path;
use yw_novx::xmlio;
use yw_novx::yw7;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_yw7_to_novx_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "book.yw7", common::sample_yw7());

    let target = run_convert(&source, "", true).unwrap();
    assert_eq!(target, dir.path().join("book.novx"));
    assert!(target.is_file());

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("<!DOCTYPE novx SYSTEM \"novx_1_4.dtd\">"));
}

#[test]
fn test_suffix_in_target_name() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "book.yw7", common::sample_yw7());

    let target = run_convert(&source, "_bak", true).unwrap();
    assert_eq!(target, dir.path().join("book_bak.novx"));
    assert!(target.is_file());
}

#[test]
fn test_novx_to_yw7_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "book.novx", common::sample_novx());

    let target = run_convert(&source, "", true).unwrap();
    assert_eq!(target, dir.path().join("book.yw7"));

    let written = std::fs::read_to_string(&target).unwrap();
    let doc = xmlio::parse_document(&written).unwrap();
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "YWRITER7");

    let project = xmlio::child(root, "PROJECT").unwrap();
    assert_eq!(xmlio::child_text(project, "Title").as_deref(), Some("Test Novel"));

    // The arc comes back as an extra chapter pair: container part + arc chapter.
    let chapters = xmlio::child(root, "CHAPTERS").unwrap();
    let chapter_count = chapters
        .children()
        .filter(|c| c.has_tag_name("CHAPTER"))
        .count();
    assert_eq!(chapter_count, 3);
}

#[test]
fn test_roundtrip_preserves_scene_content() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "book.yw7", common::sample_yw7());

    let novx_path = run_convert(&source, "", true).unwrap();
    let yw7_path = run_convert(&novx_path, "", true).unwrap();
    assert_eq!(yw7_path, source);
    // The original source survives as the backup.
    assert!(backup_path(&source).is_file());

    let reread = yw7::read_project(&yw7_path).unwrap();
    let novel = &reread.novel;
    assert_eq!(novel.title.as_deref(), Some("Test Novel"));
    assert_eq!(novel.tree.sections_of("ch1"), ["sc1", "sc2"]);
    assert_eq!(
        novel.sections["sc1"].content().unwrap(),
        "<p>First line with <em>emphasis</em>.</p><p>Second line.</p>"
    );
    assert_eq!(novel.plot_lines.len(), 1);
    let arc_id = &novel.tree.plot_lines()[0];
    assert_eq!(novel.plot_lines[arc_id].short_name.as_deref(), Some("A"));
}

#[test]
fn test_nonexistent_source_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("missing.yw7");

    let err = run_convert(&source, "", true).unwrap_err();
    assert!(err.to_string().contains("file not found"));
    assert!(!dir.path().join("missing.novx").exists());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "book.odt", "not a project");

    let err = run_convert(&source, "", true).unwrap_err();
    assert!(err.to_string().contains("not supported"));
}
