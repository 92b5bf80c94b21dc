//! Dictionary merge/split and keyword canonicalization over real documents.

use crate::config::DocumentConfig;
use crate::dictionary::{canonize_dict_parameters, merge_dicts, split_dict, NameMap};
use crate::error::DocumentError;
use crate::flow::Flow;
use crate::line::Line;
use crate::parameter::ParameterType;
use crate::project::Project;

fn config() -> DocumentConfig {
    DocumentConfig::bundled()
}

fn keywords(doc: &crate::document::Document) -> Vec<String> {
    doc.dictionary()
        .entries(doc)
        .iter()
        .map(|e| e.keyword(doc).to_string())
        .collect()
}

#[test]
fn entries_are_restricted_to_variable_types() {
    let config = config();
    let mut flow = Flow::new(&config);
    let dictionary = flow.dictionary();
    dictionary
        .append_entry(&mut flow, ParameterType::Float, "dt", "0.004")
        .unwrap();
    let err = dictionary
        .append_entry(&mut flow, ParameterType::Enum, "bad", "x")
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidDocument(_)));
    assert_eq!(keywords(&flow), ["dt"]);
}

#[test]
fn entries_round_trip_with_type_and_value() {
    let config = config();
    let mut flow = Flow::new(&config);
    let dictionary = flow.dictionary();
    dictionary
        .append_entry(&mut flow, ParameterType::Int, "ns", "2048")
        .unwrap();

    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    let entries = reloaded.dictionary().entries(&reloaded);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].ptype(&reloaded), ParameterType::Int);
    assert_eq!(entries[0].keyword(&reloaded), "ns");
    assert_eq!(entries[0].value(&reloaded), "2048");
    assert_eq!(entries[0].scope(&reloaded), None);
}

#[test]
fn merge_flattens_scopes_in_order_and_split_restores_them() {
    let config = config();
    let mut flow = Flow::new(&config);
    let mut line = Line::new(&config);
    let mut project = Project::new(&config);

    for (kw, value) in [("foo", "1"), ("foo2", "2")] {
        flow.dictionary()
            .append_entry(&mut flow, ParameterType::Int, kw, value)
            .unwrap();
    }
    for (kw, value) in [("bar", "3"), ("bar2", "4")] {
        line.dictionary()
            .append_entry(&mut line, ParameterType::Int, kw, value)
            .unwrap();
    }
    for (kw, value) in [("baz", "5"), ("baz2", "6")] {
        project
            .dictionary()
            .append_entry(&mut project, ParameterType::Int, kw, value)
            .unwrap();
    }

    merge_dicts(&mut flow, &mut line, &mut project, None).unwrap();

    assert_eq!(keywords(&flow), ["foo", "foo2", "bar", "bar2", "baz", "baz2"]);
    assert!(keywords(&line).is_empty());
    assert!(keywords(&project).is_empty());
    let scopes: Vec<_> = flow
        .dictionary()
        .entries(&flow)
        .iter()
        .map(|e| e.scope(&flow).unwrap().to_string())
        .collect();
    assert_eq!(scopes, ["flow", "flow", "line", "line", "project", "project"]);

    split_dict(&mut flow, &mut line, &mut project).unwrap();

    assert_eq!(keywords(&flow), ["foo", "foo2"]);
    assert_eq!(keywords(&line), ["bar", "bar2"]);
    assert_eq!(keywords(&project), ["baz", "baz2"]);
    // Scope tags are consumed on the way back.
    for entry in flow.dictionary().entries(&flow) {
        assert_eq!(entry.scope(&flow), None);
    }
    for entry in line.dictionary().entries(&line) {
        assert_eq!(entry.scope(&line), None);
    }
}

#[test]
fn merge_drops_entries_the_validator_rejects() {
    let config = config();
    let mut flow = Flow::new(&config);
    let mut line = Line::new(&config);
    let mut project = Project::new(&config);

    line.dictionary()
        .append_entry(&mut line, ParameterType::String, "keep", "v")
        .unwrap();
    line.dictionary()
        .append_entry(&mut line, ParameterType::String, "", "orphan value")
        .unwrap();

    let validator = |keyword: &str, _value: &str| !keyword.is_empty();
    merge_dicts(&mut flow, &mut line, &mut project, Some(&validator)).unwrap();

    assert_eq!(keywords(&flow), ["keep"]);
    assert!(keywords(&line).is_empty());
}

#[test]
fn merged_document_still_validates() {
    let config = config();
    let mut flow = Flow::new(&config);
    let mut line = Line::new(&config);
    let mut project = Project::new(&config);
    line.dictionary()
        .append_entry(&mut line, ParameterType::Float, "dt", "0.004")
        .unwrap();
    merge_dicts(&mut flow, &mut line, &mut project, None).unwrap();

    // The scope attribute is part of the current schema.
    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    let entries = reloaded.dictionary().entries(&reloaded);
    assert_eq!(entries[0].scope(&reloaded), Some("line"));
}

#[test]
fn canonization_numbers_collisions_in_first_seen_order() {
    let config = config();
    let mut flow = Flow::new(&config);
    let dictionary = flow.dictionary();
    for kw in [
        "CDP EM METROS",
        "CDP EM METROS (m)",
        "CDP EM METROS  m ",
        "CdP EM METROs %m%",
    ] {
        dictionary
            .append_entry(&mut flow, ParameterType::Float, kw, "0")
            .unwrap();
    }

    let mut names = NameMap::new();
    canonize_dict_parameters(&mut flow, &mut names);

    assert_eq!(
        keywords(&flow),
        [
            "cdp_em_metros",
            "cdp_em_metros__m",
            "cdp_em_metros__m_1",
            "cdp_em_metros__m_2",
        ]
    );
    assert_eq!(names["CDP EM METROS  m "], "cdp_em_metros__m_1");

    // A second pass over the now-canonical document changes nothing.
    let before = keywords(&flow);
    canonize_dict_parameters(&mut flow, &mut names);
    assert_eq!(keywords(&flow), before);
}

#[test]
fn canonical_keywords_are_left_alone_and_block_their_name() {
    let config = config();
    let mut flow = Flow::new(&config);
    let dictionary = flow.dictionary();
    dictionary
        .append_entry(&mut flow, ParameterType::Int, "cdp", "1")
        .unwrap();
    dictionary
        .append_entry(&mut flow, ParameterType::Int, "CDP", "2")
        .unwrap();

    let mut names = NameMap::new();
    canonize_dict_parameters(&mut flow, &mut names);

    // The already-canonical entry keeps its name even though it appears
    // after nothing; the clashing entry is numbered around it.
    assert_eq!(keywords(&flow), ["cdp", "cdp_1"]);
    assert_eq!(names["cdp"], "cdp");
    assert_eq!(names["CDP"], "cdp_1");
}

#[test]
fn digit_only_keywords_gain_a_prefix() {
    let config = config();
    let mut flow = Flow::new(&config);
    flow.dictionary()
        .append_entry(&mut flow, ParameterType::Int, "1234", "0")
        .unwrap();
    let mut names = NameMap::new();
    canonize_dict_parameters(&mut flow, &mut names);
    assert_eq!(keywords(&flow), ["var_1234"]);
}

#[test]
fn empty_keywords_participate_in_numbering() {
    let config = config();
    let mut flow = Flow::new(&config);
    let dictionary = flow.dictionary();
    for _ in 0..2 {
        dictionary
            .append_entry(&mut flow, ParameterType::String, "  ", "v")
            .unwrap();
    }
    let mut names = NameMap::new();
    canonize_dict_parameters(&mut flow, &mut names);
    assert_eq!(keywords(&flow), ["", "_1"]);
}

#[test]
fn name_map_accumulates_across_documents() {
    let config = config();
    let mut names = NameMap::new();

    let mut flow = Flow::new(&config);
    flow.dictionary()
        .append_entry(&mut flow, ParameterType::Int, "Max Offset", "0")
        .unwrap();
    canonize_dict_parameters(&mut flow, &mut names);

    let mut line = Line::new(&config);
    line.dictionary()
        .append_entry(&mut line, ParameterType::Int, "Water Depth", "0")
        .unwrap();
    canonize_dict_parameters(&mut line, &mut names);

    assert_eq!(names.len(), 2);
    assert_eq!(names["Max Offset"], "max_offset");
    assert_eq!(names["Water Depth"], "water_depth");
}
