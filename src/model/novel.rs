//! The novel: project metadata plus id-keyed element stores.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::chapter::{Chapter, ChapterLevel, ChapterType};
use super::character::Character;
use super::link::Link;
use super::plot::{PlotLine, PlotPoint};
use super::section::{Section, SectionType};
use super::tree::StoryTree;
use super::world::WorldElement;

static LANGUAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span xml:lang="(.*?)">"#).unwrap());

/// A free-form project note (title + description).
#[derive(Debug, Clone, Default)]
pub struct ProjectNote {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default)]
pub struct Novel {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub author_name: Option<String>,
    pub links: Vec<Link>,
    pub word_target: Option<i64>,
    pub word_count_start: Option<i64>,
    pub language_code: Option<String>,
    pub country_code: Option<String>,
    /// Languages detected in section content, beyond the project language.
    pub languages: Option<Vec<String>>,
    pub renumber_chapters: bool,
    pub renumber_parts: bool,
    pub renumber_within_parts: bool,
    pub roman_chapter_numbers: bool,
    pub roman_part_numbers: bool,
    pub save_word_count: bool,
    /// Work phase 1..=5, if tracked.
    pub work_phase: Option<u8>,
    pub chapter_heading_prefix: Option<String>,
    pub chapter_heading_suffix: Option<String>,
    pub part_heading_prefix: Option<String>,
    pub part_heading_suffix: Option<String>,
    pub custom_plot_progress: Option<String>,
    pub custom_characterization: Option<String>,
    pub custom_world_building: Option<String>,
    pub custom_goal: Option<String>,
    pub custom_conflict: Option<String>,
    pub custom_outcome: Option<String>,
    pub custom_chr_bio: Option<String>,
    pub custom_chr_goals: Option<String>,
    /// ISO reference date that anchors unspecific section days.
    pub reference_date: Option<String>,

    pub chapters: HashMap<String, Chapter>,
    pub sections: HashMap<String, Section>,
    pub characters: HashMap<String, Character>,
    pub locations: HashMap<String, WorldElement>,
    pub items: HashMap<String, WorldElement>,
    pub plot_lines: HashMap<String, PlotLine>,
    pub plot_points: HashMap<String, PlotPoint>,
    pub project_notes: HashMap<String, ProjectNote>,
    pub tree: StoryTree,
}

impl Novel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a usable language/country pair.
    ///
    /// A well-formed pair (two-letter code each) is kept. A missing
    /// language falls back to the `LANG` environment variable, then to
    /// the "no linguistic content" codes `zxx`/`none`. A malformed pair
    /// is replaced with `zxx`/`none` outright.
    pub fn check_locale(&mut self) {
        let language = self.language_code.as_deref().unwrap_or("");
        if language.is_empty() || language == "None" {
            if let Some((lang, country)) = system_locale() {
                self.language_code = Some(lang);
                self.country_code = Some(country);
            } else {
                self.language_code = Some("zxx".to_string());
                self.country_code = Some("none".to_string());
            }
            return;
        }
        let country = self.country_code.as_deref().unwrap_or("");
        if language.len() == 2 && country.len() == 2 {
            return;
        }
        self.language_code = Some("zxx".to_string());
        self.country_code = Some("none".to_string());
    }

    /// Scans all section content for language spans and records each
    /// language once, in order of first occurrence.
    pub fn detect_languages(&mut self) {
        let mut languages: Vec<String> = Vec::new();
        for sc_id in self.tree.all_sections() {
            let Some(section) = self.sections.get(&sc_id) else {
                continue;
            };
            let Some(text) = section.content() else {
                continue;
            };
            for capture in LANGUAGE_TAG.captures_iter(text) {
                let language = capture[1].to_string();
                if !languages.contains(&language) {
                    languages.push(language);
                }
            }
        }
        self.languages = Some(languages);
    }

    /// Propagates part types to their chapters and chapter types to their
    /// sections, so a section is never "more normal" than its chapter.
    pub fn adjust_section_types(&mut self) {
        let mut part_type = ChapterType::Normal;
        for ch_id in self.tree.chapters().to_vec() {
            let Some(chapter) = self.chapters.get_mut(&ch_id) else {
                continue;
            };
            if chapter.level == ChapterLevel::Part {
                part_type = chapter.ch_type;
            } else if part_type != ChapterType::Normal && !chapter.is_trash {
                chapter.ch_type = part_type;
            }
            let ch_code = chapter.ch_type as u8;
            for sc_id in self.tree.sections_of(&ch_id).to_vec() {
                if let Some(section) = self.sections.get_mut(&sc_id) {
                    if section.sc_type.code() < ch_code {
                        section.sc_type = SectionType::from_code(ch_code);
                    }
                }
            }
        }
    }

    /// Word totals over all non-trash chapters: (words in normal sections,
    /// words including unused sections). Stages never count.
    pub fn count_words(&self) -> (usize, usize) {
        let mut count = 0;
        let mut total_count = 0;
        for ch_id in self.tree.chapters() {
            let trash = self
                .chapters
                .get(ch_id)
                .map_or(false, |chapter| chapter.is_trash);
            if trash {
                continue;
            }
            for sc_id in self.tree.sections_of(ch_id) {
                let Some(section) = self.sections.get(sc_id) else {
                    continue;
                };
                if section.sc_type.code() < 2 {
                    total_count += section.word_count();
                    if section.sc_type == SectionType::Normal {
                        count += section.word_count();
                    }
                }
            }
        }
        (count, total_count)
    }
}

/// Language/country from the `LANG` environment variable ("en_US.UTF-8").
fn system_locale() -> Option<(String, String)> {
    let lang = std::env::var("LANG").ok()?;
    let locale = lang.split('.').next()?;
    let (language, country) = locale.split_once('_')?;
    if language.len() == 2 && country.len() == 2 {
        Some((language.to_string(), country.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novel_with_sections(contents: &[(&str, &str)]) -> Novel {
        let mut novel = Novel::new();
        novel.tree.add_chapter("ch1");
        for (id, text) in contents {
            let mut section = Section::new();
            section.set_content(Some(text.to_string()));
            novel.sections.insert(id.to_string(), section);
            novel.tree.add_section("ch1", id);
        }
        novel
    }

    #[test]
    fn test_detect_languages_in_order() {
        let mut novel = novel_with_sections(&[
            ("sc1", r#"<p><span xml:lang="fr">bonjour</span></p>"#),
            ("sc2", r#"<p><span xml:lang="de">hallo</span> <span xml:lang="fr">salut</span></p>"#),
        ]);
        novel.detect_languages();
        assert_eq!(novel.languages.as_deref().unwrap(), ["fr", "de"]);
    }

    #[test]
    fn test_detect_languages_none_found() {
        let mut novel = novel_with_sections(&[("sc1", "<p>plain</p>")]);
        novel.detect_languages();
        assert_eq!(novel.languages.as_deref().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_check_locale_keeps_valid_pair() {
        let mut novel = Novel::new();
        novel.language_code = Some("de".to_string());
        novel.country_code = Some("AT".to_string());
        novel.check_locale();
        assert_eq!(novel.language_code.as_deref(), Some("de"));
        assert_eq!(novel.country_code.as_deref(), Some("AT"));
    }

    #[test]
    fn test_check_locale_rejects_malformed() {
        let mut novel = Novel::new();
        novel.language_code = Some("german".to_string());
        novel.country_code = Some("AT".to_string());
        novel.check_locale();
        assert_eq!(novel.language_code.as_deref(), Some("zxx"));
        assert_eq!(novel.country_code.as_deref(), Some("none"));
    }

    #[test]
    fn test_adjust_section_types_propagates_unused() {
        let mut novel = Novel::new();
        let mut part = Chapter::new();
        part.level = ChapterLevel::Part;
        part.ch_type = ChapterType::Unused;
        novel.chapters.insert("ch1".to_string(), part);
        novel.tree.add_chapter("ch1");

        let chapter = Chapter::new();
        novel.chapters.insert("ch2".to_string(), chapter);
        novel.tree.add_chapter("ch2");
        novel.sections.insert("sc1".to_string(), Section::new());
        novel.tree.add_section("ch2", "sc1");

        novel.adjust_section_types();
        assert_eq!(novel.chapters["ch2"].ch_type, ChapterType::Unused);
        assert_eq!(novel.sections["sc1"].sc_type, SectionType::Unused);
    }

    #[test]
    fn test_count_words_skips_unused_and_trash() {
        let mut novel = Novel::new();
        novel.chapters.insert("ch1".to_string(), Chapter::new());
        novel.tree.add_chapter("ch1");

        let mut normal = Section::new();
        normal.set_content(Some("<p>one two three</p>".to_string()));
        novel.sections.insert("sc1".to_string(), normal);
        novel.tree.add_section("ch1", "sc1");

        let mut unused = Section::new();
        unused.sc_type = SectionType::Unused;
        unused.set_content(Some("<p>four five</p>".to_string()));
        novel.sections.insert("sc2".to_string(), unused);
        novel.tree.add_section("ch1", "sc2");

        let mut stage = Section::new();
        stage.sc_type = SectionType::Stage;
        stage.set_content(Some("<p>never counted</p>".to_string()));
        novel.sections.insert("sc3".to_string(), stage);
        novel.tree.add_section("ch1", "sc3");

        let (count, total) = novel.count_words();
        assert_eq!(count, 3);
        assert_eq!(total, 5);
    }
}
