//! Line-level outline parsing.
//!
//! The scan is a single pass over the input lines producing a flat,
//! level-tagged heading sequence; [`tree::build_forest`] then reconstructs
//! the hierarchy implied by the levels.

use crate::outline::{DONE_KEYWORDS, OrgNode, TODO_KEYWORDS, tree};

/// Parses outline text into its preamble and heading forest.
pub fn parse(content: &str) -> (String, Vec<OrgNode>) {
    let mut preamble = Vec::new();
    let mut flat: Vec<OrgNode> = Vec::new();
    let mut body: Vec<&str> = Vec::new();

    for line in content.lines() {
        match parse_heading_line(line) {
            Some(node) => {
                if let Some(last) = flat.last_mut() {
                    last.body = take_body(&mut body);
                } else {
                    preamble = std::mem::take(&mut body);
                }
                flat.push(node);
            }
            None => body.push(line),
        }
    }

    if let Some(last) = flat.last_mut() {
        last.body = take_body(&mut body);
    } else {
        preamble = body;
    }

    (join_trimmed(&preamble), tree::build_forest(flat))
}

fn take_body(body: &mut Vec<&str>) -> String {
    join_trimmed(&std::mem::take(body))
}

fn join_trimmed(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.truncate(text.trim_end().len());
    text
}

/// Recognizes a heading line, returning a childless node for it.
///
/// Grammar: `*`-run, whitespace, optional TODO keyword, optional `[#X]`
/// priority cookie, title, optional trailing `:tag:tag:` list. A `*`-run not
/// followed by whitespace is body text, not a heading.
fn parse_heading_line(line: &str) -> Option<OrgNode> {
    let stars = line.len() - line.trim_start_matches('*').len();
    if stars == 0 {
        return None;
    }
    let rest = &line[stars..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }

    let mut rest = rest.trim();
    let mut node = OrgNode::new(stars, "");

    if let Some(keyword) = leading_keyword(rest) {
        node.todo = Some(keyword.to_string());
        rest = rest[keyword.len()..].trim_start();
    }

    if let Some(priority) = leading_priority(rest) {
        node.priority = Some(priority);
        rest = rest[4..].trim_start();
    }

    let (title, tags) = split_trailing_tags(rest);
    node.title = title.to_string();
    node.tags = tags;

    Some(node)
}

fn leading_keyword(rest: &str) -> Option<&str> {
    TODO_KEYWORDS
        .iter()
        .chain(DONE_KEYWORDS.iter())
        .copied()
        .find(|kw| {
            rest.strip_prefix(kw)
                .is_some_and(|after| after.starts_with(' ') || after.starts_with('\t'))
        })
}

fn leading_priority(rest: &str) -> Option<char> {
    let mut chars = rest.chars();
    if chars.next() != Some('[') || chars.next() != Some('#') {
        return None;
    }
    let letter = chars.next()?;
    if letter.is_ascii_uppercase() && chars.next() == Some(']') {
        Some(letter)
    } else {
        None
    }
}

/// Splits `Some title :a:b:` into the title and its tag list.
///
/// Tags are only recognized as the last whitespace-delimited token, wrapped
/// in colons with no inner whitespace. A plain trailing colon stays part of
/// the title.
fn split_trailing_tags(rest: &str) -> (&str, Vec<String>) {
    let Some(last) = rest.split_whitespace().last() else {
        return ("", Vec::new());
    };

    if last.len() > 2 && last.starts_with(':') && last.ends_with(':') {
        let tags: Vec<String> = last
            .trim_matches(':')
            .split(':')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if !tags.is_empty() {
            let title = rest[..rest.len() - last.len()].trim_end();
            return (title, tags);
        }
    }

    (rest, Vec::new())
}
