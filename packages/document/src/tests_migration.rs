//! Migration of historical document versions up to the current ones.

use crate::config::DocumentConfig;
use crate::document::{Document, DocumentKind};
use crate::error::DocumentError;
use crate::flow::{Flow, ProgramStatus};
use crate::line::Line;
use crate::parameter::ParameterType;
use crate::project::Project;
use seisflow_common::Version;

fn config() -> DocumentConfig {
    DocumentConfig::bundled()
}

const LEGACY_FLOW: &str = r#"<flow version="0.1.0">
  <filename>legacy.flw</filename>
  <title>Legacy stack</title>
  <description>pre-io era</description>
  <help></help>
  <author>A</author>
  <email>a@example.com</email>
  <program>
    <title>Filter</title>
    <binary>sufilter</binary>
    <description></description>
    <help></help>
    <parameters>
      <int required="yes"><label>Window</label><keyword>win</keyword><value>7</value></int>
      <flag><label>Verbose</label><keyword>v</keyword></flag>
    </parameters>
  </program>
  <category>seismic</category>
</flow>"#;

#[test]
fn legacy_flow_reaches_the_current_version() {
    let flow = Flow::from_xml(LEGACY_FLOW, &config()).unwrap();
    assert_eq!(flow.version(), Some(Version::new(0, 4, 0)));
    // Pre-migration content survives untouched.
    assert_eq!(flow.title(), "Legacy stack");
    assert_eq!(flow.program_count(), 1);
}

#[test]
fn migrated_flow_validates_against_the_current_schema() {
    let config = config();
    let flow = Flow::from_xml(LEGACY_FLOW, &config).unwrap();
    // Serializing and reloading exercises the 0.4.0 descriptor end to end.
    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    assert!(flow.tree_eq(&reloaded));
}

#[test]
fn date_io_and_dictionary_blocks_are_inserted() {
    let flow = Flow::from_xml(LEGACY_FLOW, &config()).unwrap();
    let root = flow.tree().root();
    assert!(flow.tree().child_by_tag(root, "date").is_some());
    assert!(flow.tree().child_by_tag(root, "io").is_some());
    assert!(flow.tree().child_by_tag(root, "dictionary").is_some());
    assert_eq!(flow.io().input(&flow), "");
    assert!(flow.dictionary().entries(&flow).is_empty());
}

#[test]
fn bare_typed_parameters_become_envelopes() {
    let flow = Flow::from_xml(LEGACY_FLOW, &config()).unwrap();
    let program = flow.programs()[0];
    let parameters = program.parameters(&flow).parameters(&flow);
    assert_eq!(parameters.len(), 2);

    let int = parameters[0];
    assert_eq!(int.ptype(&flow), ParameterType::Int);
    // Attributes of the bare element migrate onto the envelope.
    assert!(int.required(&flow));
    assert_eq!(int.label(&flow), "Window");
    assert_eq!(int.keyword(&flow), "win");
    assert_eq!(int.value(&flow), "7");

    let flag = parameters[1];
    assert_eq!(flag.ptype(&flow), ParameterType::Flag);
    assert!(!flag.required(&flow));
}

#[test]
fn program_attributes_are_stamped() {
    let flow = Flow::from_xml(LEGACY_FLOW, &config()).unwrap();
    let program = flow.programs()[0];
    assert_eq!(program.status(&flow), ProgramStatus::Unconfigured);
    assert!(!program.stdin(&flow));
    assert!(!program.stdout(&flow));
    assert!(!program.stderr(&flow));
}

#[test]
fn trailing_categories_move_before_the_io_block() {
    let flow = Flow::from_xml(LEGACY_FLOW, &config()).unwrap();
    assert_eq!(flow.categories(), ["seismic"]);
    let root = flow.tree().root();
    let tags: Vec<&str> = flow
        .tree()
        .children(root)
        .iter()
        .map(|&c| flow.tree().tag(c))
        .collect();
    let category = tags.iter().position(|&t| t == "category").unwrap();
    let io = tags.iter().position(|&t| t == "io").unwrap();
    let program = tags.iter().position(|&t| t == "program").unwrap();
    assert!(category < io && io < program);
}

#[test]
fn migration_is_idempotent_on_current_documents() {
    let config = config();
    let flow = Flow::new(&config);
    let reloaded = Flow::from_xml(&flow.to_xml(), &config).unwrap();
    assert!(flow.tree_eq(&reloaded));
}

#[test]
fn intermediate_versions_migrate_too() {
    let xml = r#"<flow version="0.3.1">
      <filename></filename><title>Mid</title><description></description>
      <help></help><author></author><email></email>
      <date><created></created><modified></modified></date>
      <io><input></input><output></output><error></error></io>
      <category>after io</category>
    </flow>"#;
    let flow = Flow::from_xml(xml, &config()).unwrap();
    assert_eq!(flow.version(), Some(Version::new(0, 4, 0)));
    assert_eq!(flow.categories(), ["after io"]);
    let root = flow.tree().root();
    assert!(flow.tree().child_by_tag(root, "dictionary").is_some());
}

#[test]
fn legacy_line_and_project_gain_dictionaries() {
    let config = config();
    let line_xml = r#"<line version="0.1.0">
      <filename></filename><title>L</title><description></description>
      <help></help><author></author><email></email>
      <date><created></created><modified></modified></date>
      <path>/data</path>
      <flow source="stack.flw"></flow>
    </line>"#;
    let line = Line::from_xml(line_xml, &config).unwrap();
    assert_eq!(line.version(), Some(Version::new(0, 2, 0)));
    assert!(line.dictionary().entries(&line).is_empty());
    assert_eq!(line.paths().len(), 1);
    assert_eq!(line.flows().len(), 1);

    let project_xml = r#"<project version="0.1.0">
      <filename></filename><title>P</title><description></description>
      <help></help><author></author><email></email>
      <date><created></created><modified></modified></date>
      <line source="survey.lne"></line>
    </project>"#;
    let project = Project::from_xml(project_xml, &config).unwrap();
    assert_eq!(project.version(), Some(Version::new(0, 2, 0)));
    assert!(project.dictionary().entries(&project).is_empty());
    assert_eq!(project.lines().len(), 1);
}

#[test]
fn declared_versions_ahead_of_the_library_are_refused() {
    let xml = r#"<flow version="9.9.9"><filename></filename></flow>"#;
    let err = Document::from_xml(xml, &config()).unwrap_err();
    match err {
        DocumentError::NewerVersion { declared, current } => {
            assert_eq!(declared, Version::new(9, 9, 9));
            assert_eq!(current, Version::new(0, 4, 0));
        }
        other => panic!("expected NewerVersion, got {other:?}"),
    }
}

#[test]
fn documents_invalid_under_their_declared_schema_are_refused() {
    // io is a 0.2.0 construct; a 0.1.0 document must not carry it.
    let xml = r#"<flow version="0.1.0">
      <filename></filename><title></title><description></description>
      <help></help><author></author><email></email>
      <io><input></input><output></output><error></error></io>
    </flow>"#;
    let err = Document::from_xml(xml, &config()).unwrap_err();
    assert!(matches!(err, DocumentError::InvalidDocument(_)));
}

#[test]
fn current_version_comes_from_the_last_step() {
    let table = crate::migration::MigrationTable::standard();
    assert_eq!(table.current_version(DocumentKind::Flow), Version::new(0, 4, 0));
    assert_eq!(table.current_version(DocumentKind::Line), Version::new(0, 2, 0));
    assert_eq!(table.current_version(DocumentKind::Project), Version::new(0, 2, 0));
}
