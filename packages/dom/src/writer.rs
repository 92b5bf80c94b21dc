use crate::tree::{NodeId, Tree};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Serialize a [`Tree`] to an XML string, with an XML declaration.
///
/// CDATA sections tolerate an interior `]]>` by substituting the
/// near-identical `]]&gt;` on write, so help markup can mention the closing
/// delimiter without breaking the section.
pub fn to_xml(tree: &Tree) -> String {
    let mut writer = Writer::new(Vec::new());
    // The writer only fails on io::Write errors and Vec<u8> cannot fail.
    let _ = writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)));
    write_node(tree, tree.root(), &mut writer);
    let bytes = writer.into_inner();
    String::from_utf8(bytes).unwrap_or_default()
}

fn write_node(tree: &Tree, id: NodeId, writer: &mut Writer<Vec<u8>>) {
    let mut start = BytesStart::new(tree.tag(id));
    for (name, value) in tree.attributes(id) {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    let _ = writer.write_event(Event::Start(start));

    let text = tree.text(id);
    if !text.is_empty() {
        if tree.is_cdata(id) {
            let safe = text.replace("]]>", "]]&gt;");
            let _ = writer.write_event(Event::CData(BytesCData::new(safe)));
        } else {
            let _ = writer.write_event(Event::Text(BytesText::new(text)));
        }
    }
    for &child in tree.children(id) {
        write_node(tree, child, writer);
    }

    let _ = writer.write_event(Event::End(BytesEnd::new(tree.tag(id))));
}
