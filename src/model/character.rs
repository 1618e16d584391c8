//! Character element.

use super::link::Link;

#[derive(Debug, Clone, Default)]
pub struct Character {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub notes: Option<String>,
    pub aka: Option<String>,
    pub tags: Vec<String>,
    pub links: Vec<Link>,
    pub bio: Option<String>,
    pub goals: Option<String>,
    pub full_name: Option<String>,
    pub is_major: bool,
    /// ISO birth date.
    pub birth_date: Option<String>,
    /// ISO death date.
    pub death_date: Option<String>,
}

impl Character {
    pub fn new() -> Self {
        Self::default()
    }
}
