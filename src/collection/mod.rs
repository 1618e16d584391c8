//! novelyst collection manifest upgrade (`.pwc` -> `.nvcx`).
//!
//! A collection manifest lists series and books pointing at project
//! files. Two source dialects exist: the v1 lowercase tags and the older
//! all-caps tags. The upgrade rewrites either into the nvcx format and
//! converts every referenced `.yw7` book to `.novx` on the way.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::Node;
use thiserror::Error;

use crate::novx;
use crate::utils::fsio::{read_xml_text, write_with_backup};
use crate::xmlio::{child, parse_document};
use crate::yw7;

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE COLLECTION SYSTEM \"nvcx_1_0.dtd\">\n<?xml-stylesheet href=\"collection.css\" type=\"text/css\"?>\n";

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("file must be .pwc type, but is \"{extension}\"")]
    WrongExtension { extension: String },
    #[error("no collection found in file: \"{path}\"")]
    NoCollection { path: String },
    #[error("no valid version found in file: \"{path}\"")]
    NoVersion { path: String },
    #[error("the collection was created with a newer plugin version")]
    NewerVersion,
    #[error("cannot process collection file: {message}")]
    Malformed { message: String },
    #[error("converting book \"{path}\" failed: {message}")]
    Book { path: String, message: String },
    #[error("cannot write file: \"{path}\"")]
    Write { path: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tag/attribute names of one manifest dialect.
struct TagMap {
    collection: &'static str,
    series: &'static str,
    book: &'static str,
    id: &'static str,
    path: &'static str,
    title: &'static str,
    desc: &'static str,
}

const V1_MAP: TagMap = TagMap {
    collection: "collection",
    series: "series",
    book: "book",
    id: "id",
    path: "path",
    title: "title",
    desc: "desc",
};

const OLD_MAP: TagMap = TagMap {
    collection: "COLLECTION",
    series: "SERIES",
    book: "BOOK",
    id: "ID",
    path: "Path",
    title: "Title",
    desc: "Desc",
};

/// Upgrades a `.pwc` collection manifest to `.nvcx` format.
///
/// Referenced `.yw7` books are converted to `.novx` siblings unless the
/// sibling already exists; the manifest records the `.novx` paths.
pub fn upgrade_collection(source: &Path, target: &Path) -> Result<(), CollectionError> {
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string();
    if extension != "pwc" {
        return Err(CollectionError::WrongExtension { extension });
    }
    let display = source.display().to_string();
    let text = read_xml_text(source)?;
    let doc = parse_document(&text).map_err(|e| CollectionError::Malformed {
        message: e.to_string(),
    })?;
    let root = doc.root_element();

    let map = if root.tag_name().name() == V1_MAP.collection {
        &V1_MAP
    } else if root.tag_name().name() == OLD_MAP.collection {
        &OLD_MAP
    } else {
        return Err(CollectionError::NoCollection { path: display });
    };

    let version = root.attribute("version").unwrap_or("");
    let (major, _minor) = version
        .split_once('.')
        .ok_or_else(|| CollectionError::NoVersion {
            path: display.clone(),
        })?;
    let major: u32 = major.parse().map_err(|_| CollectionError::NoVersion {
        path: display.clone(),
    })?;
    if major > 1 {
        return Err(CollectionError::NewerVersion);
    }

    let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    let mut target_root = BytesStart::new("COLLECTION");
    target_root.push_attribute(("version", "1.0"));
    w.write_event(Event::Start(target_root))?;

    for element in root.children().filter(|c| c.is_element()) {
        if element.has_tag_name(map.book) {
            write_element(&mut w, element, map, "BOOK", "bk")?;
        } else if element.has_tag_name(map.series) {
            let mut series = BytesStart::new("SERIES");
            series.push_attribute(("id", prefixed_id(element, map, "sr")?.as_str()));
            w.write_event(Event::Start(series))?;
            write_title_and_desc(&mut w, element, map)?;
            for book in element.descendants().filter(|c| c.has_tag_name(map.book)) {
                write_element(&mut w, book, map, "BOOK", "bk")?;
            }
            w.write_event(Event::End(BytesEnd::new("SERIES")))?;
        }
    }

    w.write_event(Event::End(BytesEnd::new("COLLECTION")))?;
    let bytes = w.into_inner().into_inner();
    let body = String::from_utf8(bytes).expect("writer produced valid UTF-8");
    write_with_backup(target, &format!("{XML_HEADER}{body}")).map_err(|_| {
        CollectionError::Write {
            path: target.display().to_string(),
        }
    })
}

fn prefixed_id(element: Node, map: &TagMap, prefix: &str) -> Result<String, CollectionError> {
    let id = element
        .attribute(map.id)
        .ok_or_else(|| CollectionError::Malformed {
            message: format!("<{}> without an id", element.tag_name().name()),
        })?;
    Ok(format!("{prefix}{id}"))
}

fn write_title_and_desc(
    w: &mut Writer<Cursor<Vec<u8>>>,
    element: Node,
    map: &TagMap,
) -> Result<(), CollectionError> {
    if let Some(title) = child(element, map.title).and_then(|t| t.text()) {
        if !title.is_empty() {
            w.write_event(Event::Start(BytesStart::new("Title")))?;
            w.write_event(Event::Text(BytesText::new(title)))?;
            w.write_event(Event::End(BytesEnd::new("Title")))?;
        }
    }
    if let Some(desc) = child(element, map.desc).and_then(|d| d.text()) {
        if !desc.is_empty() {
            w.write_event(Event::Start(BytesStart::new("Desc")))?;
            for paragraph in desc.split('\n') {
                w.write_event(Event::Start(BytesStart::new("p")))?;
                w.write_event(Event::Text(BytesText::new(paragraph.trim())))?;
                w.write_event(Event::End(BytesEnd::new("p")))?;
            }
            w.write_event(Event::End(BytesEnd::new("Desc")))?;
        }
    }
    Ok(())
}

fn write_element(
    w: &mut Writer<Cursor<Vec<u8>>>,
    element: Node,
    map: &TagMap,
    target_tag: &str,
    prefix: &str,
) -> Result<(), CollectionError> {
    let mut el = BytesStart::new(target_tag);
    el.push_attribute(("id", prefixed_id(element, map, prefix)?.as_str()));
    w.write_event(Event::Start(el))?;
    write_title_and_desc(w, element, map)?;

    if let Some(book_path) = child(element, map.path).and_then(|p| p.text()) {
        if let Some(novx_path) = upgrade_book_path(Path::new(book_path))? {
            w.write_event(Event::Start(BytesStart::new("Path")))?;
            w.write_event(Event::Text(BytesText::new(
                novx_path.to_string_lossy().as_ref(),
            )))?;
            w.write_event(Event::End(BytesEnd::new("Path")))?;
        }
    }
    w.write_event(Event::End(BytesEnd::new(target_tag)))?;
    Ok(())
}

/// Converts a referenced `.yw7` book to `.novx` if needed and returns the
/// path the manifest should record. Already-converted `.novx` references
/// are kept; dangling paths are dropped from the manifest.
fn upgrade_book_path(book_path: &Path) -> Result<Option<PathBuf>, CollectionError> {
    if !book_path.is_file() {
        return Ok(None);
    }
    match book_path.extension().and_then(|e| e.to_str()) {
        Some("yw7") => {
            let novx_path = book_path.with_extension("novx");
            if !novx_path.is_file() {
                convert_book(book_path, &novx_path)?;
            }
            Ok(Some(novx_path))
        }
        Some("novx") => Ok(Some(book_path.to_path_buf())),
        _ => Ok(None),
    }
}

fn convert_book(source: &Path, target: &Path) -> Result<(), CollectionError> {
    let mut project = yw7::read_project(source).map_err(|e| CollectionError::Book {
        path: source.display().to_string(),
        message: e.to_string(),
    })?;
    novx::write_project(target, &mut project).map_err(|e| CollectionError::Book {
        path: source.display().to_string(),
        message: e.to_string(),
    })
}
