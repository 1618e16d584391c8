//! Section element (a yw7 "scene").

use once_cell::sync::Lazy;
use regex::Regex;

use super::link::Link;

// Word counting: dashes and paragraph ends separate words; markup tags,
// inline notes and comments are not words at all.
static ADDITIONAL_WORD_LIMITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--|—|–|</p>").unwrap());
static NO_WORD_LIMITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<note>.*?</note>|<comment>.*?</comment>|<.+?>").unwrap());

/// Section category. Stages are structural template sections that never
/// count towards the manuscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SectionType {
    #[default]
    Normal = 0,
    Unused = 1,
    Stage = 2,
    Substage = 3,
}

impl SectionType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => SectionType::Normal,
            1 => SectionType::Unused,
            2 => SectionType::Stage,
            3 => SectionType::Substage,
            _ => SectionType::Unused,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Stages never carry manuscript text.
    pub fn is_stage(self) -> bool {
        matches!(self, SectionType::Stage | SectionType::Substage)
    }
}

/// Action/reaction classification of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SceneKind {
    #[default]
    NotApplicable = 0,
    Action = 1,
    Reaction = 2,
    Other = 3,
}

impl SceneKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => SceneKind::Action,
            2 => SceneKind::Reaction,
            3 => SceneKind::Other,
            _ => SceneKind::NotApplicable,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Completion status of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Status {
    #[default]
    Outline = 1,
    Draft = 2,
    FirstEdit = 3,
    SecondEdit = 4,
    Done = 5,
}

impl Status {
    /// Accepts the novx status attribute; anything outside 2..=5 is Outline.
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => Status::Draft,
            3 => Status::FirstEdit,
            4 => Status::SecondEdit,
            5 => Status::Done,
            _ => Status::Outline,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Default)]
pub struct Section {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub notes: Option<String>,
    pub links: Vec<Link>,
    pub tags: Vec<String>,
    pub sc_type: SectionType,
    pub scene: SceneKind,
    pub status: Status,
    pub append_to_prev: bool,
    pub goal: Option<String>,
    pub conflict: Option<String>,
    pub outcome: Option<String>,
    /// Notes per plot line, keyed by plot line id, in document order.
    pub plotline_notes: Vec<(String, String)>,
    /// Specific date (ISO) — mutually exclusive with `day`.
    pub date: Option<String>,
    pub time: Option<String>,
    /// Unspecific day number relative to the project reference date.
    pub day: Option<String>,
    pub lasts_days: Option<String>,
    pub lasts_hours: Option<String>,
    pub lasts_minutes: Option<String>,
    pub characters: Vec<String>,
    pub locations: Vec<String>,
    pub items: Vec<String>,
    /// Plot lines this section belongs to (backlink, not serialized here).
    pub plot_lines: Vec<String>,
    /// Plot points anchored on this section: (point id, plot line id).
    pub plot_points: Vec<(String, String)>,

    content: Option<String>,
    word_count: usize,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section text as a novx paragraph fragment (`<p>…</p>…`).
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Assigns the section text and recomputes the word count.
    pub fn set_content(&mut self, content: Option<String>) {
        self.word_count = match &content {
            Some(text) => {
                let text = ADDITIONAL_WORD_LIMITS.replace_all(text, " ");
                let text = NO_WORD_LIMITS.replace_all(&text, "");
                text.split_whitespace().count()
            }
            None => 0,
        };
        self.content = content;
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_plain() {
        let mut section = Section::new();
        section.set_content(Some("<p>Four words in here</p>".to_string()));
        assert_eq!(section.word_count(), 4);
    }

    #[test]
    fn test_word_count_dashes_separate() {
        let mut section = Section::new();
        section.set_content(Some("<p>twenty--one</p>".to_string()));
        assert_eq!(section.word_count(), 2);
    }

    #[test]
    fn test_word_count_ignores_markup_and_comments() {
        let mut section = Section::new();
        section.set_content(Some(
            "<p><em>Two</em> words<comment><p>not this</p></comment></p>".to_string(),
        ));
        assert_eq!(section.word_count(), 2);
    }

    #[test]
    fn test_word_count_paragraph_boundary() {
        let mut section = Section::new();
        section.set_content(Some("<p>one</p><p>two</p>".to_string()));
        assert_eq!(section.word_count(), 2);
    }

    #[test]
    fn test_word_count_cleared() {
        let mut section = Section::new();
        section.set_content(Some("<p>words</p>".to_string()));
        section.set_content(None);
        assert_eq!(section.word_count(), 0);
    }

    #[test]
    fn test_status_from_code_clamps() {
        assert_eq!(Status::from_code(3), Status::FirstEdit);
        assert_eq!(Status::from_code(0), Status::Outline);
        assert_eq!(Status::from_code(9), Status::Outline);
    }

    #[test]
    fn test_section_type_from_code() {
        assert_eq!(SectionType::from_code(2), SectionType::Stage);
        assert_eq!(SectionType::from_code(7), SectionType::Unused);
    }
}
