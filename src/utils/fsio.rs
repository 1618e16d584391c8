//! File reading/writing helpers shared by the format modules.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

// Control characters that are not legal in XML 1.0 documents. yWriter
// occasionally leaves them behind; they are stripped before parsing.
static ILLEGAL_XML_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f]").unwrap());

pub fn strip_illegal_characters(text: &str) -> String {
    ILLEGAL_XML_CHARS.replace_all(text, "").into_owned()
}

/// Reads an XML text file.
///
/// Old yWriter installations wrote UTF-16 project files; anything with a
/// BOM is decoded accordingly, everything else is treated as UTF-8.
/// Illegal control characters are stripped from the result.
pub fn read_xml_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let text = match encoding_rs::Encoding::for_bom(&bytes) {
        Some((encoding, _)) => {
            // decode() strips the BOM it detected.
            let (text, _, _) = encoding.decode(&bytes);
            text.into_owned()
        }
        None => String::from_utf8_lossy(&bytes).into_owned(),
    };
    Ok(strip_illegal_characters(&text))
}

/// The sibling backup name: `project.novx` -> `project.novx.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Writes `content` to `path`, keeping a backup of any existing file.
///
/// An existing target is renamed to `<name>.bak` first and renamed back
/// if the write fails. The backup stays around on success.
pub fn write_with_backup(path: &Path, content: &str) -> io::Result<()> {
    let backup = backup_path(path);
    let mut backed_up = false;
    if path.is_file() {
        fs::rename(path, &backup)?;
        backed_up = true;
    }
    match fs::write(path, content) {
        Ok(()) => Ok(()),
        Err(err) => {
            if backed_up {
                let _ = fs::rename(&backup, path);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_illegal_characters() {
        assert_eq!(strip_illegal_characters("a\x00b\x1fc\td"), "abc\td");
    }

    #[test]
    fn test_read_utf16_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yw7");
        let mut bytes = vec![0xff, 0xfe];
        for unit in "<YWRITER7/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(&path, bytes).unwrap();
        assert_eq!(read_xml_text(&path).unwrap(), "<YWRITER7/>");
    }

    #[test]
    fn test_write_with_backup_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.novx");
        fs::write(&path, "old").unwrap();
        write_with_backup(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "old");
    }

    #[test]
    fn test_write_with_backup_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.novx");
        write_with_backup(&path, "content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
        assert!(!backup_path(&path).exists());
    }
}
