//! Non-interactive subcommands.

use docwalk_document::Document;
use docwalk_engine::{CursorSelection, Granularities, Walker, spoken, verify};

/// `docwalk check`: one line per granularity, and whether all passed.
pub fn check(doc: &Document, granularities: &Granularities) -> (Vec<String>, bool) {
    let mut ok = true;
    let lines = granularities
        .iter()
        .map(|walker| match verify(walker, doc) {
            Ok(report) => format!(
                "{}: ok ({} positions, {} probes)",
                report.granularity, report.positions, report.probes
            ),
            Err(violation) => {
                ok = false;
                log::warn!("{violation}");
                format!("{}: FAILED: {violation}", walker.granularity_label())
            }
        })
        .collect();
    (lines, ok)
}

/// `docwalk dump`: the spoken description of every position, in order.
pub fn dump(doc: &Document, walker: &dyn Walker) -> Vec<String> {
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
