//! Forest reconstruction and serialization for the outline model.

use crate::outline::OrgNode;

/// Rebuilds the heading hierarchy from a flat, level-tagged sequence.
///
/// Single stack-based pass: each incoming heading pops and finalizes every
/// stack entry at its level or deeper, attaching each finalized node to the
/// new stack top (or the result list once the stack empties), then pushes
/// itself. Level gaps nest one step, so a level-3 heading directly under a
/// level-1 heading becomes its direct child.
pub fn build_forest(flat: Vec<OrgNode>) -> Vec<OrgNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<OrgNode> = Vec::new();

    for node in flat {
        while stack.last().is_some_and(|top| top.level >= node.level) {
            if let Some(finished) = stack.pop() {
                attach(finished, &mut stack, &mut roots);
            }
        }
        stack.push(node);
    }

    while let Some(node) = stack.pop() {
        attach(node, &mut stack, &mut roots);
    }

    roots
}

fn attach(node: OrgNode, stack: &mut Vec<OrgNode>, roots: &mut Vec<OrgNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Serializes a preamble and heading forest back to outline text.
///
/// Pre-order depth-first: each node emits its heading line (stars, optional
/// keyword, optional priority cookie, title, trailing tag list), then its
/// body, then its children. Re-parsing the output reproduces the same
/// heading tuples modulo whitespace normalization.
pub fn serialize(preamble: &str, nodes: &[OrgNode]) -> String {
    let mut out = String::new();

    if !preamble.trim().is_empty() {
        out.push_str(preamble.trim_end());
        out.push('\n');
    }

    for node in nodes {
        write_node(&mut out, node);
    }

    out
}

fn write_node(out: &mut String, node: &OrgNode) {
    for _ in 0..node.level {
        out.push('*');
    }
    out.push(' ');

    if let Some(todo) = &node.todo {
        out.push_str(todo);
        out.push(' ');
    }

    if let Some(priority) = node.priority {
        out.push_str(&format!("[#{priority}] "));
    }

    out.push_str(&node.title);

    if !node.tags.is_empty() {
        out.push_str(" :");
        out.push_str(&node.tags.join(":"));
        out.push(':');
    }
    out.push('\n');

    if !node.body.trim().is_empty() {
        out.push_str(node.body.trim_end());
        out.push('\n');
    }

    for child in &node.children {
        write_node(out, child);
    }
}
