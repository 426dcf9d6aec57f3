//! XML parser that builds element trees.
//!
//! Uses quick-xml's streaming API. Repeated child elements are grouped into
//! named slots as they appear, so the one-or-many shape of the input is
//! captured directly.

use std::collections::HashMap;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::tree::Element;

/// Synthetic wrapper element name used while parsing; never escapes this
/// module.
const WRAPPER_TAG: &str = "$document$";

/// Parses XML text into an element tree.
///
/// Fails with [`Error::Parse`] when the text is not well-formed markup or
/// does not contain exactly one root element. Whitespace-only character data
/// is dropped and interior whitespace is normalized to single spaces.
pub fn parse_str(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    // Whitespace is normalized here, not trimmed by the reader.
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut stack: Vec<Element> = vec![Element::new(WRAPPER_TAG)];
    let mut current_text: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    flush_text(&mut current_text, top);
                }
                let element = parse_element(e, &reader)?;
                stack.push(element);
            }
            Ok(Event::End(_)) => {
                let mut closed = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unbalanced end tag".to_string()))?;
                flush_text(&mut current_text, &mut closed);
                match stack.last_mut() {
                    Some(parent) => parent.push_child(closed.name().to_string(), closed),
                    None => return Err(Error::Parse("unbalanced end tag".to_string())),
                }
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    flush_text(&mut current_text, top);
                }
                let element = parse_element(e, &reader)?;
                match stack.last_mut() {
                    Some(parent) => parent.push_child(element.name().to_string(), element),
                    None => return Err(Error::Parse("element outside document".to_string())),
                }
            }
            Ok(Event::Text(e)) => {
                let raw =
                    std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                accumulate_text(&mut current_text, &text);
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref());
                accumulate_text(&mut current_text, &text);
            }
            Ok(Event::Eof) => break,
            Ok(Event::Comment(_)) => {
                // Comments are not part of the document model.
            }
            Ok(Event::Decl(_)) | Ok(Event::PI(_)) => {
                // Ignore XML declaration and processing instructions.
            }
            Ok(Event::DocType(_)) => {
                // Ignore DOCTYPE.
            }
            Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(Error::Parse("unexpected end of document".to_string()));
    }
    let mut wrapper = stack
        .pop()
        .ok_or_else(|| Error::Parse("unexpected end of document".to_string()))?;

    let top_level: usize = wrapper.slots().map(|(_, slot)| slot.len()).sum();
    match top_level {
        0 => Err(Error::Parse("no root element".to_string())),
        1 => {
            let name = wrapper
                .slots()
                .next()
                .map(|(name, _)| name.to_string())
                .ok_or_else(|| Error::Parse("no root element".to_string()))?;
            let root = wrapper
                .remove_slot(&name)
                .map(|slot| slot.into_sequence())
                .and_then(|mut seq| (!seq.is_empty()).then(|| seq.remove(0)))
                .ok_or_else(|| Error::Parse("no root element".to_string()))?;
            Ok(root)
        }
        _ => Err(Error::Parse("multiple root elements".to_string())),
    }
}

/// Parses an element's name and attributes.
fn parse_element(e: &BytesStart, reader: &Reader<&[u8]>) -> Result<Element> {
    let name = reader
        .decoder()
        .decode(e.name().as_ref())
        .map_err(|e| Error::Parse(e.to_string()))?
        .to_string();

    let mut attributes = HashMap::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| Error::Parse(format!("attribute error: {}", e)))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();
        attributes.insert(key, value);
    }

    let mut element = Element::new(name);
    for (key, value) in attributes {
        element.set_attr(key, value);
    }
    Ok(element)
}

/// Appends normalized text to the pending character data.
fn accumulate_text(current_text: &mut Option<String>, text: &str) {
    if let Some(normalized) = normalize_whitespace(text, current_text.as_deref()) {
        match current_text {
            Some(existing) => existing.push_str(&normalized),
            None => *current_text = Some(normalized),
        }
    }
}

/// Moves accumulated character data onto the element it belongs to.
fn flush_text(current_text: &mut Option<String>, target: &mut Element) {
    if let Some(text) = current_text.take() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            match target.text() {
                Some(existing) => {
                    let mut merged = existing.to_string();
                    merged.push(' ');
                    merged.push_str(trimmed);
                    target.set_text(Some(merged));
                }
                None => target.set_text(Some(trimmed.to_string())),
            }
        }
    }
}

/// Collapses consecutive whitespace to a single space, tracking whether the
/// previously accumulated text already ended with one. Returns `None` when
/// the fragment holds no non-whitespace content at all.
fn normalize_whitespace(text: &str, previous: Option<&str>) -> Option<String> {
    let mut last_was_ws = previous.is_none_or(|p| p.ends_with(' '));
    let mut has_non_ws = false;
    let mut result = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_ws {
                result.push(' ');
                last_was_ws = true;
            }
        } else {
            result.push(c);
            last_was_ws = false;
            has_non_ws = true;
        }
    }

    if has_non_ws {
        Some(result)
    } else {
        None
    }
}
