//! Insertion-ordered story structure.
//!
//! Element structs are stored in id-keyed maps on [`super::Novel`]; the
//! order of chapters, of the sections within a chapter, and of every other
//! element category lives here. Reading a project rebuilds the tree in
//! document order, and both writers iterate it instead of the maps.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct StoryTree {
    chapters: Vec<String>,
    characters: Vec<String>,
    locations: Vec<String>,
    items: Vec<String>,
    plot_lines: Vec<String>,
    project_notes: Vec<String>,
    sections: HashMap<String, Vec<String>>,
    plot_points: HashMap<String, Vec<String>>,
}

impl StoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chapter(&mut self, id: &str) {
        self.chapters.push(id.to_string());
        self.sections.entry(id.to_string()).or_default();
    }

    pub fn add_section(&mut self, chapter_id: &str, id: &str) {
        self.sections
            .entry(chapter_id.to_string())
            .or_default()
            .push(id.to_string());
    }

    pub fn add_plot_line(&mut self, id: &str) {
        self.plot_lines.push(id.to_string());
        self.plot_points.entry(id.to_string()).or_default();
    }

    pub fn add_plot_point(&mut self, plot_line_id: &str, id: &str) {
        self.plot_points
            .entry(plot_line_id.to_string())
            .or_default()
            .push(id.to_string());
    }

    pub fn add_character(&mut self, id: &str) {
        self.characters.push(id.to_string());
    }

    pub fn add_location(&mut self, id: &str) {
        self.locations.push(id.to_string());
    }

    pub fn add_item(&mut self, id: &str) {
        self.items.push(id.to_string());
    }

    pub fn add_project_note(&mut self, id: &str) {
        self.project_notes.push(id.to_string());
    }

    pub fn chapters(&self) -> &[String] {
        &self.chapters
    }

    pub fn sections_of(&self, chapter_id: &str) -> &[String] {
        self.sections.get(chapter_id).map_or(&[], |v| v.as_slice())
    }

    pub fn plot_lines(&self) -> &[String] {
        &self.plot_lines
    }

    pub fn plot_points_of(&self, plot_line_id: &str) -> &[String] {
        self.plot_points.get(plot_line_id).map_or(&[], |v| v.as_slice())
    }

    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn project_notes(&self) -> &[String] {
        &self.project_notes
    }

    /// All section ids in chapter order.
    pub fn all_sections(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for ch_id in &self.chapters {
            ids.extend(self.sections_of(ch_id).iter().cloned());
        }
        ids
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_and_section_order() {
        let mut tree = StoryTree::new();
        tree.add_chapter("ch2");
        tree.add_chapter("ch1");
        tree.add_section("ch2", "sc5");
        tree.add_section("ch2", "sc1");
        tree.add_section("ch1", "sc3");

        assert_eq!(tree.chapters(), ["ch2", "ch1"]);
        assert_eq!(tree.sections_of("ch2"), ["sc5", "sc1"]);
        assert_eq!(tree.all_sections(), ["sc5", "sc1", "sc3"]);
    }

    #[test]
    fn test_unknown_parent_is_empty() {
        let tree = StoryTree::new();
        assert!(tree.sections_of("ch9").is_empty());
        assert!(tree.plot_points_of("ac9").is_empty());
    }

    #[test]
    fn test_reset() {
        let mut tree = StoryTree::new();
        tree.add_character("cr1");
        tree.add_plot_line("ac1");
        tree.add_plot_point("ac1", "ap1");
        tree.reset();
        assert!(tree.characters().is_empty());
        assert!(tree.plot_lines().is_empty());
    }
}
