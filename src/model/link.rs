//! External link attached to a project element.

/// A link as stored in novx `<Link>` elements: a (possibly relative) path
/// plus an optional resolved full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub path: String,
    pub full_path: Option<String>,
}
