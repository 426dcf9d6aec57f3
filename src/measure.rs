//! Revision difference measurement.
//!
//! Extracts the flattened text of a document revision and computes the word
//! error rate between two revisions. The metric is conventional WER: word
//! substitutions, insertions and deletions divided by the baseline word
//! count, with no custom weighting. Callers freeze a baseline when a page is
//! first marked reviewed and recompute against the current revision on each
//! re-review.

use crate::constants::{CONTENT_ATTR, HYP_TAG, STRING_TAG, TEXT_LINE_TAG};
use crate::document::{BlockKind, Document};
use crate::tree::Element;

/// One line of extracted text plus its hyphenation flag.
struct LineText {
    text: String,
    hyphenated: bool,
}

/// Returns the document's full text content.
///
/// Tokens are space-joined within a line; lines, blocks, areas and pages are
/// space-joined in document order, except that a line ending in a hyphen
/// marker continues directly into the next line's first token. Text in page
/// margins is included alongside the print area.
pub fn extract_text(doc: &Document) -> String {
    let mut lines = Vec::new();
    for page in doc.pages() {
        for (_, slot) in page.slots() {
            for area in slot.as_sequence() {
                collect_area(area, &mut lines);
            }
        }
    }

    let mut out = String::new();
    let mut continuing = false;
    for line in lines {
        if line.text.is_empty() {
            continue;
        }
        if !out.is_empty() && !continuing {
            out.push(' ');
        }
        out.push_str(&line.text);
        continuing = line.hyphenated;
    }
    out
}

/// Collects lines from a page area (print space or margin).
fn collect_area(area: &Element, lines: &mut Vec<LineText>) {
    for (name, slot) in area.slots() {
        if BlockKind::from_name(name).is_some() {
            for block in slot.as_sequence() {
                collect_block(block, lines);
            }
        }
    }
}

/// Collects lines from a block, descending composed blocks recursively.
fn collect_block(block: &Element, lines: &mut Vec<LineText>) {
    match BlockKind::from_name(block.name()) {
        Some(BlockKind::Text) => {
            for line in block.children_of(TEXT_LINE_TAG) {
                lines.push(line_text(line));
            }
        }
        Some(BlockKind::Composed) => {
            // Same traversal as a page area: any mixture of blocks, at any
            // nesting depth.
            collect_area(block, lines);
        }
        _ => {}
    }
}

/// Joins a line's token contents. The hyphen marker's own content is not
/// emitted; the flag suppresses the following inter-line space so the split
/// word reads as one.
fn line_text(line: &Element) -> LineText {
    let words: Vec<&str> = line
        .children_of(STRING_TAG)
        .iter()
        .filter_map(|token| token.attr(CONTENT_ATTR))
        .collect();
    LineText {
        text: words.join(" "),
        hyphenated: line.slot(HYP_TAG).is_some(),
    }
}

/// Computes the word error rate between a baseline and a revised text.
///
/// Word-level Levenshtein distance over whitespace-tokenized words, divided
/// by the baseline word count. Identical token sequences yield `0.0`. An
/// empty baseline is defined as `0.0` against an empty revision and `1.0`
/// otherwise (pure-insertion sentinel); the result is never NaN.
pub fn word_error_rate(baseline: &str, revised: &str) -> f64 {
    let base: Vec<&str> = baseline.split_whitespace().collect();
    let rev: Vec<&str> = revised.split_whitespace().collect();

    if base.is_empty() {
        return if rev.is_empty() { 0.0 } else { 1.0 };
    }

    edit_distance(&base, &rev) as f64 / base.len() as f64
}

/// Word-level Levenshtein distance, two-row dynamic programming.
fn edit_distance(a: &[&str], b: &[&str]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, wa) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, wb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(wa != wb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
