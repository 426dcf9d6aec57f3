//! Synthetic node identity.
//!
//! Every node gets a process-local unique key immediately after parsing so
//! that UI consumers have stable handles across re-renders. The key lives in
//! the reserved attribute [`NODE_ID_ATTR`], is never an addressing mechanism
//! for mutation, and must be stripped before serialization.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::NODE_ID_ATTR;
use crate::tree::Element;

/// Global counter for generating unique node keys.
static NODE_KEY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a fresh opaque node key.
fn next_key() -> String {
    format!("n{}", NODE_KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Assigns a fresh unique key to the element and every descendant,
/// depth-first pre-order. Keys are unique across the whole process, so
/// re-tagging an already tagged tree is harmless.
pub fn tag(mut root: Element) -> Element {
    tag_in_place(&mut root);
    root
}

fn tag_in_place(el: &mut Element) {
    el.set_attr(NODE_ID_ATTR, next_key());
    for (_, slot) in el.slots_mut() {
        for child in slot.as_sequence_mut() {
            tag_in_place(child);
        }
    }
}

/// Removes the reserved key from the element and every descendant. Inverse
/// of [`tag`] with respect to every other attribute and child.
pub fn untag(mut root: Element) -> Element {
    untag_in_place(&mut root);
    root
}

fn untag_in_place(el: &mut Element) {
    el.remove_attr(NODE_ID_ATTR);
    for (_, slot) in el.slots_mut() {
        for child in slot.as_sequence_mut() {
            untag_in_place(child);
        }
    }
}

/// Returns the synthetic key of a node, if it has been tagged.
pub fn node_key(el: &Element) -> Option<&str> {
    el.attr(NODE_ID_ATTR)
}
