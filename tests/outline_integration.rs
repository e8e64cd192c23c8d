use orgnote_core::outline::{self, OrgNode};

#[test]
fn parse_simple_outline() {
    let content = "\
* TODO Task 1 :work:project:
  This is the content of task 1.
** DONE Subtask 1.1
   This is subtask content.";

    let (preamble, nodes) = outline::parse(content);

    assert!(preamble.is_empty());
    assert_eq!(nodes.len(), 1);

    let task = &nodes[0];
    assert_eq!(task.level, 1);
    assert_eq!(task.title, "Task 1");
    assert_eq!(task.todo.as_deref(), Some("TODO"));
    assert_eq!(task.tags, vec!["work", "project"]);
    assert!(task.body.contains("content of task 1"));

    assert_eq!(task.children.len(), 1);
    let subtask = &task.children[0];
    assert_eq!(subtask.level, 2);
    assert_eq!(subtask.title, "Subtask 1.1");
    assert_eq!(subtask.todo.as_deref(), Some("DONE"));
    assert!(subtask.is_done());
}

#[test]
fn heading_line_markup() {
    let (_, nodes) = outline::parse("** TODO [#A] Ship the release :work:urgent:");

    assert_eq!(nodes.len(), 1);
    let node = &nodes[0];
    assert_eq!(node.level, 2);
    assert_eq!(node.todo.as_deref(), Some("TODO"));
    assert_eq!(node.priority, Some('A'));
    assert_eq!(node.title, "Ship the release");
    assert_eq!(node.tags, vec!["work", "urgent"]);
}

#[test]
fn keyword_requires_following_whitespace() {
    // TODAY starts with TODO but is not a keyword.
    let (_, nodes) = outline::parse("* TODAY is fine");
    assert_eq!(nodes[0].todo, None);
    assert_eq!(nodes[0].title, "TODAY is fine");
}

#[test]
fn bold_text_is_not_a_heading() {
    let (preamble, nodes) = outline::parse("*emphasis* is body text\nno stars here");
    assert!(nodes.is_empty());
    assert_eq!(preamble, "*emphasis* is body text\nno stars here");
}

#[test]
fn hierarchy_law_for_one_two_three_two_one() {
    let content = "\
* First
** Alpha
*** Deep
** Beta
* Second";

    let (_, nodes) = outline::parse(content);

    // Two top-level nodes; the first has two children, the first of which
    // has one child; the second top-level node is a leaf.
    assert_eq!(nodes.len(), 2);

    let first = &nodes[0];
    assert_eq!(first.title, "First");
    assert_eq!(first.children.len(), 2);
    assert_eq!(first.children[0].title, "Alpha");
    assert_eq!(first.children[0].children.len(), 1);
    assert_eq!(first.children[0].children[0].title, "Deep");
    assert_eq!(first.children[1].title, "Beta");
    assert!(first.children[1].children.is_empty());

    let second = &nodes[1];
    assert_eq!(second.title, "Second");
    assert!(second.children.is_empty());
}

#[test]
fn level_gaps_nest_one_step() {
    // A level-3 heading directly under a level-1 heading is nested one level
    // deep, not three.
    let (_, nodes) = outline::parse("* Top\n*** Jumped");

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].children.len(), 1);
    let jumped = &nodes[0].children[0];
    assert_eq!(jumped.level, 3);
    assert_eq!(jumped.title, "Jumped");
    assert!(jumped.children.is_empty());
}

#[test]
fn text_without_headings_becomes_preamble() {
    let content = "just some notes\nspread over lines\n";
    let (preamble, nodes) = outline::parse(content);

    assert!(nodes.is_empty());
    assert_eq!(preamble, "just some notes\nspread over lines");
}

#[test]
fn preamble_precedes_first_heading() {
    let content = "#+TITLE: Capture\n\n* First entry\n  body";
    let (preamble, nodes) = outline::parse(content);

    assert_eq!(preamble, "#+TITLE: Capture");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].title, "First entry");
}

#[test]
fn serialize_then_parse_round_trips() {
    let content = "\
Some preamble text.
* TODO [#B] Plan the week :planning:
  Weekly planning notes.
** WAITING Call the plumber
* DONE Groceries :errands:home:
  Milk and eggs.";

    let (preamble, nodes) = outline::parse(content);
    let rendered = outline::serialize(&preamble, &nodes);
    let (preamble2, nodes2) = outline::parse(&rendered);

    assert_eq!(preamble, preamble2);
    assert_eq!(nodes, nodes2);
}

#[test]
fn serialize_emits_expected_heading_lines() {
    let mut node = OrgNode::new(1, "Plan the week");
    node.todo = Some("TODO".to_string());
    node.priority = Some('B');
    node.tags = vec!["planning".to_string()];
    node.body = "Weekly planning notes.".to_string();

    let rendered = outline::serialize("", &[node]);

    assert_eq!(
        rendered,
        "* TODO [#B] Plan the week :planning:\nWeekly planning notes.\n"
    );
}
