use docwalk_document::Document;
use docwalk_engine::{
    CursorSelection, Granularities, NodeWalker, RecordingHost, SelectionError, SentenceWalker,
    Walker, WordWalker, spoken, verify, walker_for_label,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture(name: &str) -> Document {
    let md = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    Document::from_markdown(&md)
}

fn walker(label: &str) -> Box<dyn Walker> {
    walker_for_label(label).unwrap()
}

/// Spoken line for every position, walking forward from the document start.
fn spoken_walk(walker: &dyn Walker, doc: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    let Ok(mut prev) = CursorSelection::from_document_start(doc, false) else {
        return lines;
    };
    let mut current = walker.sync(doc, prev);
    while let Some(sel) = current {
        lines.push(spoken(&walker.description(doc, prev, sel)));
        prev = sel;
        current = walker.next(doc, sel);
    }
    lines
}

#[test]
fn node_walker_reads_three_paragraphs() {
    let doc = fixture("three_paragraphs");
    let walker = NodeWalker;

    let first = walker.sync_to_document_start(&doc, false).unwrap();
    assert_eq!(doc.text(first.start().node), "First paragraph.");
    let second = walker.next(&doc, first).unwrap();
    assert_eq!(doc.text(second.start().node), "Second paragraph.");
    let third = walker.next(&doc, second).unwrap();
    assert_eq!(doc.text(third.start().node), "Third paragraph.");
    assert_eq!(walker.next(&doc, third), None);

    let last = walker.sync_to_document_start(&doc, true).unwrap();
    assert_eq!(last, third.with_reversed(true));
    assert_eq!(walker.next(&doc, last), Some(second.with_reversed(true)));
}

#[rstest]
fn empty_document_has_no_positions(
    #[values("node", "word", "sentence", "cell")] label: &str,
    #[values("", "\n\n  \n")] input: &str,
) {
    let doc = Document::from_markdown(input);
    assert_eq!(
        CursorSelection::from_document_start(&doc, false),
        Err(SelectionError::EmptyDocument)
    );
    let walker = walker(label);
    assert_eq!(walker.sync_to_document_start(&doc, false), None);
    assert_eq!(walker.sync_to_document_start(&doc, true), None);
}

#[rstest]
fn act_without_actions_leaves_host_alone(
    #[values("node", "word", "sentence", "cell")] label: &str,
) {
    let doc = Document::from_markdown("| plain |\n|---|\n| text |\n");
    let walker = walker(label);
    let sel = walker.sync_to_document_start(&doc, false).unwrap();
    let mut host = RecordingHost::new();

    assert!(!walker.act(&doc, sel, &mut host));
    assert!(host.is_untouched());
}

#[rstest]
fn contract_holds_on_fixtures(
    #[values("node", "word", "sentence", "cell")] label: &str,
    #[values("guide", "three_paragraphs")] name: &str,
) {
    let doc = fixture(name);
    let report = verify(walker(label).as_ref(), &doc).unwrap();
    assert_eq!(report.granularity, label);
}

#[test]
fn guide_position_counts() {
    let doc = fixture("guide");
    let counts: Vec<(&str, usize)> = Granularities::standard()
        .iter()
        .map(|w| (w.granularity_label(), verify(w, &doc).unwrap().positions))
        .collect();
    // Two header cells, two body rows of two cells each.
    assert_eq!(counts[3], ("cell", 6));
    assert!(counts[1].1 > counts[2].1, "more words than sentences: {counts:?}");
}

#[test]
fn node_descriptions_announce_entered_containers() {
    let doc = Document::from_markdown("# Title\n\n- [link](u)\n- `code`\n");
    insta::assert_snapshot!(
        spoken_walk(&NodeWalker, &doc).join(" | "),
        @"Heading 1, Title | List with 2 items, link, Link | code, Code"
    );
}

#[test]
fn foreign_selection_never_syncs() {
    let doc = fixture("guide");
    let other = fixture("guide");
    let foreign = CursorSelection::from_document_start(&other, false).unwrap();
    for walker in Granularities::standard().iter() {
        assert_eq!(
            walker.sync(&doc, foreign),
            None,
            "{}",
            walker.granularity_label()
        );
    }
}

#[test]
fn switching_granularity_resyncs_around_the_focus() {
    let doc = Document::from_markdown("Alpha *beta* gamma. Delta.\n");
    let words = WordWalker::new();
    let first = words.sync_to_document_start(&doc, false).unwrap();
    let beta = words.next(&doc, first).unwrap();
    // "Alpha" stops short of the token's trailing space; "beta" fills its
    // emphasis token exactly.
    assert!(!NodeWalker.is_valid(&doc, first));
    assert!(NodeWalker.is_valid(&doc, beta));

    let node = NodeWalker.sync(&doc, beta).unwrap();
    assert_eq!(doc.text(node.start().node), "beta");

    let sentences = SentenceWalker::new();
    let sentence = sentences.sync(&doc, beta).unwrap();
    assert_eq!(
        sentences.description(&doc, beta, sentence)[0].text,
        "Alpha beta gamma."
    );
    let braille = words.braille(&doc, first, beta);
    assert_eq!(braille.text, "Alpha beta gamma. Delta.");
    assert_eq!((braille.start, braille.end), (6, 10));
}

#[test]
fn reversed_walk_mirrors_forward_walk() {
    let doc = fixture("guide");
    for walker in Granularities::standard().iter() {
        let mut forward = Vec::new();
        let mut current = walker.sync_to_document_start(&doc, false);
        while let Some(sel) = current {
            forward.push(sel);
            current = walker.next(&doc, sel);
        }

        let mut backward = Vec::new();
        let mut current = walker.sync_to_document_start(&doc, true);
        while let Some(sel) = current {
            assert!(sel.is_reversed());
            backward.push(sel.with_reversed(false));
            current = walker.next(&doc, sel);
        }
        backward.reverse();
        assert_eq!(forward, backward, "{}", walker.granularity_label());
    }
}
