//! Round-trip, lifecycle, and sequence behavior over full documents.

use crate::config::DocumentConfig;
use crate::document::{Document, DocumentKind};
use crate::error::DocumentError;
use crate::flow::{Flow, ProgramStatus};
use crate::group::Group;
use crate::line::Line;
use crate::parameter::ParameterType;
use crate::project::Project;
use crate::sequence::SequenceError;

fn config() -> DocumentConfig {
    DocumentConfig::bundled()
}

#[test]
fn new_documents_round_trip_through_xml() {
    let config = config();
    for kind in [DocumentKind::Flow, DocumentKind::Line, DocumentKind::Project] {
        let doc = Document::new(kind, &config);
        let reloaded = Document::from_xml(&doc.to_xml(), &config).unwrap();
        assert!(doc.tree_eq(&reloaded), "{kind} did not round-trip");
        assert_eq!(reloaded.kind(), kind);
    }
}

#[test]
fn populated_flow_round_trips_with_order_preserved() {
    let config = config();
    let mut flow = Flow::new(&config);
    flow.set_title("Stack velocity analysis");
    flow.set_author("Jane");
    flow.set_email("jane@example.com");
    flow.set_description("CDP stacking");
    flow.append_category("seismic");
    let io = flow.io();
    io.set_input(&mut flow, "/data/in.su");
    io.set_output(&mut flow, "/data/out.su");

    for title in ["first", "second", "third"] {
        let program = flow.append_program();
        program.set_title(&mut flow, title);
        program.set_binary(&mut flow, "sustack");
        let parameters = program.parameters(&flow);
        let p = parameters.append_parameter(&mut flow, ParameterType::Int);
        p.set_label(&mut flow, "Window");
        p.set_keyword(&mut flow, "win");
        p.set_value(&mut flow, "10");
    }

    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    assert!(flow.tree_eq(&reloaded));
    let titles: Vec<_> = reloaded
        .programs()
        .iter()
        .map(|p| p.title(&reloaded).to_string())
        .collect();
    assert_eq!(titles, ["first", "second", "third"]);
    assert_eq!(reloaded.categories(), ["seismic"]);
    assert_eq!(reloaded.io().input(&reloaded), "/data/in.su");
}

#[test]
fn save_and_load_from_disk() {
    let config = config();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.flw");

    let mut flow = Flow::new(&config);
    flow.set_title("Disk");
    flow.save(&path).unwrap();

    let loaded = Flow::load(&path, &config).unwrap();
    assert_eq!(loaded.title(), "Disk");
    // Loading from a path records where the document came from.
    assert_eq!(loaded.filename(), path.to_string_lossy());
}

#[test]
fn load_missing_file_is_file_not_found() {
    let config = config();
    let err = Document::load("/nonexistent/nowhere.flw", &config).unwrap_err();
    assert!(matches!(err, DocumentError::FileNotFound(_)));
}

#[test]
fn embedded_doctype_is_rejected() {
    let config = config();
    let xml = "<!DOCTYPE flow SYSTEM \"flow.dtd\"><flow version=\"0.4.0\"></flow>";
    let err = Document::from_xml(xml, &config).unwrap_err();
    assert!(matches!(err, DocumentError::DtdSpecified));
}

#[test]
fn missing_schema_descriptor_is_cant_access_dtd() {
    let dir = tempfile::tempdir().unwrap();
    let empty = DocumentConfig::new(dir.path());
    let xml = Flow::new(&config()).to_xml();
    let err = Document::from_xml(&xml, &empty).unwrap_err();
    assert!(matches!(err, DocumentError::CantAccessDtd(_)));
}

#[test]
fn structural_violations_are_invalid_document() {
    let config = config();
    // title before filename: order violation against flow-0.4.0.
    let xml = r#"<flow version="0.4.0"><title>T</title><filename></filename></flow>"#;
    let err = Document::from_xml(xml, &config).unwrap_err();
    assert!(matches!(err, DocumentError::InvalidDocument(_)));
}

#[test]
fn kind_mismatch_is_wrong_kind() {
    let config = config();
    let line = Line::new(&config);
    let err = Flow::from_xml(&line.to_xml(), &config).unwrap_err();
    assert!(matches!(err, DocumentError::WrongKind { .. }));
}

#[test]
fn clones_share_no_state() {
    let config = config();
    let mut flow = Flow::new(&config);
    flow.set_title("original");
    let mut copy = flow.clone();
    copy.set_title("changed");
    copy.append_program();
    assert_eq!(flow.title(), "original");
    assert_eq!(flow.program_count(), 0);
    assert_eq!(copy.program_count(), 1);
}

#[test]
fn help_tolerates_reserved_delimiter() {
    let config = config();
    let mut flow = Flow::new(&config);
    flow.set_help("<b>watch</b> ]]> out");
    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    // The reserved closing delimiter is substituted on write.
    assert_eq!(reloaded.help(), "<b>watch</b> ]]&gt; out");
}

#[test]
fn strip_help_clears_flow_and_programs() {
    let config = config();
    let mut flow = Flow::new(&config);
    flow.set_help("flow help");
    let program = flow.append_program();
    program.set_help(&mut flow, "program help");
    flow.strip_help();
    assert_eq!(flow.help(), "");
    assert_eq!(program.help(&flow), "");
}

#[test]
fn program_sequence_navigation_and_moves() {
    let config = config();
    let mut flow = Flow::new(&config);
    let a = flow.append_program();
    let b = flow.append_program();
    let c = flow.append_program();

    assert_eq!(flow.next_in_sequence(&a).unwrap(), Some(b));
    assert_eq!(flow.previous_in_sequence(&a).unwrap(), None);
    assert_eq!(flow.next_in_sequence(&c).unwrap(), None);

    // Bounds violations fail and leave the run unchanged.
    assert_eq!(flow.move_up(&a).unwrap_err(), SequenceError::InvalidIndex);
    assert_eq!(flow.move_down(&c).unwrap_err(), SequenceError::InvalidIndex);
    assert_eq!(flow.programs(), [a, b, c]);

    flow.move_down(&a).unwrap();
    assert_eq!(flow.programs(), [b, a, c]);
    flow.move_in_sequence(&c, Some(&b)).unwrap();
    assert_eq!(flow.programs(), [c, b, a]);
    flow.move_in_sequence(&c, None).unwrap();
    assert_eq!(flow.programs(), [b, a, c]);
}

#[test]
fn removed_program_stays_readable_until_dropped() {
    let config = config();
    let mut flow = Flow::new(&config);
    let a = flow.append_program();
    a.set_title(&mut flow, "doomed");
    let b = flow.append_program();

    let held = flow.remove_from_sequence(a).unwrap();
    assert_eq!(flow.programs(), [b]);
    assert_eq!(flow.tree().text(
        flow.tree().child_by_tag(held.id(), "title").unwrap()
    ), "doomed");
}

#[test]
fn program_status_and_io_flags() {
    let config = config();
    let mut flow = Flow::new(&config);
    let program = flow.append_program();
    assert_eq!(program.status(&flow), ProgramStatus::Unconfigured);
    program.set_status(&mut flow, ProgramStatus::Configured);
    program.set_stdin(&mut flow, true);
    program.set_menu(&mut flow, "seismic.mnu", 3);

    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    let program = reloaded.programs()[0];
    assert_eq!(program.status(&reloaded), ProgramStatus::Configured);
    assert!(program.stdin(&reloaded));
    assert!(!program.stdout(&reloaded));
    assert_eq!(program.menu(&reloaded), Some(("seismic.mnu", 3)));
}

#[test]
fn enum_options_are_ordered() {
    let config = config();
    let mut flow = Flow::new(&config);
    let program = flow.append_program();
    let parameters = program.parameters(&flow);
    let e = parameters.append_parameter(&mut flow, ParameterType::Enum);
    e.append_option(&mut flow, "su", "Seismic Unix");
    e.append_option(&mut flow, "segy", "SEG-Y");

    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    let e = reloaded.programs()[0].parameters(&reloaded).parameters(&reloaded)[0];
    let options = e.options(&reloaded);
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].value(&reloaded), "su");
    assert_eq!(options[1].label(&reloaded), "SEG-Y");
}

#[test]
fn group_instances_honor_the_floor() {
    let config = config();
    let mut flow = Flow::new(&config);
    let program = flow.append_program();
    let parameters = program.parameters(&flow);
    let p = parameters.append_parameter(&mut flow, ParameterType::Group);
    let group = Group::of(p, &flow).unwrap();
    group.set_instanciable(&mut flow, true);

    let template = group.template(&flow).unwrap();
    let inner = template.append_parameter(&mut flow, ParameterType::Float);
    inner.set_keyword(&mut flow, "offset");

    assert_eq!(group.instance_count(&flow).unwrap(), 1);
    let instance = group.instantiate(&mut flow).unwrap();
    assert_eq!(group.instance_count(&flow).unwrap(), 2);
    // The clone carries the template's structure.
    assert_eq!(instance.parameters(&flow)[0].keyword(&flow), "offset");

    group.deinstantiate(&mut flow).unwrap();
    assert_eq!(group.instance_count(&flow).unwrap(), 1);
    // The master instance can never be removed.
    assert!(matches!(
        group.deinstantiate(&mut flow),
        Err(DocumentError::NotMasterInstance)
    ));
    assert_eq!(group.instance_count(&flow).unwrap(), 1);
}

#[test]
fn non_instanciable_group_surfaces_its_template() {
    let config = config();
    let mut flow = Flow::new(&config);
    let program = flow.append_program();
    let parameters = program.parameters(&flow);
    let p = parameters.append_parameter(&mut flow, ParameterType::Group);
    let group = Group::of(p, &flow).unwrap();

    let instances = group.instances(&flow).unwrap();
    assert_eq!(instances, vec![group.template(&flow).unwrap()]);
    assert!(matches!(
        group.instantiate(&mut flow),
        Err(DocumentError::NotMasterInstance)
    ));
    assert!(matches!(
        group.deinstantiate(&mut flow),
        Err(DocumentError::NotMasterInstance)
    ));
}

#[test]
fn project_deduplicates_line_references() {
    let config = config();
    let mut project = Project::new(&config);
    let first = project.append_line("lines/alpha.lne");
    let again = project.append_line("lines/alpha.lne");
    project.append_line("lines/beta.lne");
    assert_eq!(first, again);
    assert_eq!(project.lines().len(), 2);
}

#[test]
fn line_references_and_paths_round_trip() {
    let config = config();
    let mut line = Line::new(&config);
    line.set_group("cluster-a");
    line.append_path("/survey/flows");
    line.append_flow("stack.flw");
    line.append_flow("migrate.flw");

    let reloaded = Line::from_xml(&line.to_xml(), &config).unwrap();
    assert_eq!(reloaded.group(), Some("cluster-a"));
    let sources: Vec<_> = reloaded
        .flows()
        .iter()
        .map(|f| f.source(&reloaded).to_string())
        .collect();
    assert_eq!(sources, ["stack.flw", "migrate.flw"]);
    assert_eq!(reloaded.paths().len(), 1);
}

#[test]
fn list_valued_parameter_keeps_value_order() {
    let config = config();
    let mut flow = Flow::new(&config);
    let program = flow.append_program();
    let p = program
        .parameters(&flow)
        .append_parameter(&mut flow, ParameterType::Float);
    p.set_separator(&mut flow, ",");
    p.append_value(&mut flow, "1.5");
    p.append_value(&mut flow, "2.5");

    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    let p = reloaded.programs()[0].parameters(&reloaded).parameters(&reloaded)[0];
    assert_eq!(p.separator(&reloaded), Some(","));
    let values: Vec<_> = p
        .values(&reloaded)
        .iter()
        .map(|v| v.text(&reloaded).to_string())
        .collect();
    assert_eq!(values, ["1.5", "2.5"]);
}
