//! World elements: locations and items.

use super::link::Link;

#[derive(Debug, Clone, Default)]
pub struct WorldElement {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub notes: Option<String>,
    pub aka: Option<String>,
    pub tags: Vec<String>,
    pub links: Vec<Link>,
}

impl WorldElement {
    pub fn new() -> Self {
        Self::default()
    }
}
