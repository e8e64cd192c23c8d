//! The org outline model: parsing flat text into a heading forest and back.
//!
//! An outline file is plain text where a run of leading asterisks marks a
//! heading and its nesting level, optionally followed by a TODO keyword, a
//! `[#X]` priority cookie, the title, and a trailing `:tag:tag:` list. Text
//! before the first heading is the document preamble.
//!
//! Parsing never fails: text that contains no headings (or nothing our
//! grammar recognizes) comes back as one big preamble with an empty forest.

pub mod parser;
pub mod tree;

pub use parser::parse;
pub use tree::serialize;

/// Active TODO states recognized on heading lines.
pub const TODO_KEYWORDS: [&str; 3] = ["TODO", "IN-PROGRESS", "WAITING"];

/// Terminal TODO states recognized on heading lines.
pub const DONE_KEYWORDS: [&str; 2] = ["DONE", "CANCELLED"];

/// One heading in the outline forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgNode {
    /// Nesting level; the number of leading asterisks, starting at 1.
    pub level: usize,
    pub title: String,
    /// Free text between this heading and the next one.
    pub body: String,
    pub tags: Vec<String>,
    pub todo: Option<String>,
    /// Single-letter priority from a `[#X]` cookie.
    pub priority: Option<char>,
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    pub fn new(level: usize, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: String::new(),
            tags: Vec::new(),
            todo: None,
            priority: None,
            children: Vec::new(),
        }
    }

    /// Whether this heading carries a terminal TODO state.
    pub fn is_done(&self) -> bool {
        self.todo
            .as_deref()
            .is_some_and(|kw| DONE_KEYWORDS.contains(&kw))
    }
}
