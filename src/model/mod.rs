//! Project data model shared by the yw7 and novx formats.
//!
//! # Module Structure
//!
//! - `id` - element id prefixes and helpers
//! - `fields` - field-level parsing helpers (lists, dates, times)
//! - `tree` - insertion-ordered story structure
//! - `novel` - project root element and global operations
//! - `chapter`, `section`, `character`, `world`, `plot` - element structs
//! - `wordcount` - daily word-count log
//! - `project` - novel + log bundle passed between readers and writers

pub mod chapter;
pub mod character;
pub mod fields;
pub mod id;
pub mod link;
pub mod novel;
pub mod plot;
pub mod project;
pub mod section;
pub mod tree;
pub mod wordcount;
pub mod world;

pub use chapter::{Chapter, ChapterLevel, ChapterType};
pub use character::Character;
pub use link::Link;
pub use novel::{Novel, ProjectNote};
pub use plot::{PlotLine, PlotPoint};
pub use project::Project;
pub use section::{SceneKind, Section, SectionType, Status};
pub use tree::StoryTree;
pub use wordcount::{WcEntry, WordCountLog};
pub use world::WorldElement;
