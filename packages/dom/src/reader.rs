use crate::error::{DomError, DomResult};
use crate::tree::{NodeId, Tree};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse an XML buffer into a [`Tree`].
///
/// Comments, processing instructions and the XML declaration are dropped.
/// Whitespace-only text runs (pretty-printing) are dropped; any other text is
/// kept verbatim. A DOCTYPE declaration is rejected outright: schema binding
/// is implicit by (kind, version) and documents must not smuggle their own.
pub fn parse(xml: &str) -> DomResult<Tree> {
    let mut reader = Reader::from_str(xml);
    let mut tree: Option<Tree> = None;
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event() {
            Err(e) => return Err(DomError::parse(pos, e.to_string())),
            Ok(Event::DocType(_)) => return Err(DomError::DoctypeDeclared),
            Ok(Event::Start(start)) => {
                let id = open_element(&mut tree, &stack, &start, pos)?;
                stack.push(id);
            }
            Ok(Event::Empty(start)) => {
                open_element(&mut tree, &stack, &start, pos)?;
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(text)) => {
                let content = text
                    .unescape()
                    .map_err(|e| DomError::parse(pos, e.to_string()))?;
                if content.trim().is_empty() {
                    continue;
                }
                match (tree.as_mut(), stack.last()) {
                    (Some(tree), Some(&top)) => tree.push_text(top, &content),
                    _ => return Err(DomError::parse(pos, "text outside the root element")),
                }
            }
            Ok(Event::CData(cdata)) => {
                let content = std::str::from_utf8(&cdata)
                    .map_err(|e| DomError::parse(pos, e.to_string()))?
                    .to_string();
                match (tree.as_mut(), stack.last()) {
                    (Some(tree), Some(&top)) => {
                        tree.push_text(top, &content);
                        tree.set_cdata_flag(top, true);
                    }
                    _ => return Err(DomError::parse(pos, "CDATA outside the root element")),
                }
            }
            Ok(Event::Decl(_)) | Ok(Event::Comment(_)) | Ok(Event::PI(_)) => {}
            Ok(Event::Eof) => break,
        }
    }

    tree.ok_or(DomError::NoRootElement)
}

fn open_element(
    tree: &mut Option<Tree>,
    stack: &[NodeId],
    start: &BytesStart<'_>,
    pos: usize,
) -> DomResult<NodeId> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| DomError::parse(pos, e.to_string()))?
        .to_string();

    let id = match tree {
        None => tree.insert(Tree::new(&tag)).root(),
        Some(t) => match stack.last() {
            None => return Err(DomError::parse(pos, "more than one root element")),
            Some(&parent) => {
                let id = t.create_element(&tag);
                t.append_child(parent, id)?;
                id
            }
        },
    };

    if let Some(tree) = tree.as_mut() {
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| DomError::parse(pos, e.to_string()))?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| DomError::parse(pos, e.to_string()))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| DomError::parse(pos, e.to_string()))?;
            tree.set_attribute(id, key, &value);
        }
    }
    Ok(id)
}
