//! Chapter element.

use super::link::Link;

/// Whether a chapter belongs to the story or is excluded from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ChapterType {
    #[default]
    Normal = 0,
    Unused = 1,
}

impl ChapterType {
    pub fn from_flag(unused: bool) -> Self {
        if unused {
            ChapterType::Unused
        } else {
            ChapterType::Normal
        }
    }
}

/// Heading level: a part opens a new first-level heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterLevel {
    Part,
    #[default]
    Chapter,
}

#[derive(Debug, Clone, Default)]
pub struct Chapter {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub notes: Option<String>,
    pub links: Vec<Link>,
    pub level: ChapterLevel,
    pub ch_type: ChapterType,
    pub no_number: bool,
    pub is_trash: bool,
}

impl Chapter {
    pub fn new() -> Self {
        Self::default()
    }
}
