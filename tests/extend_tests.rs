#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::workspace::Workspace;
use layergen::diagnostics::MemoryDumpSink;
use layergen::document::{extend, extend_from_path, Document, Element, LEAF_TAGS};
use layergen::GenError;

fn doc(xml: &str) -> Document {
    Document::parse_str(xml).unwrap()
}

fn names<'a>(parent: &'a Element, tag: &'a str) -> Vec<&'a str> {
    parent.find_all(tag).filter_map(|e| e.attr("name")).collect()
}

#[test]
fn test_command_supplement_adds_sibling() {
    let mut base = doc(r#"<registry><command name="Foo"/></registry>"#);
    extend(&mut base, doc(r#"<registry><command name="Bar"/></registry>"#));
    assert_eq!(names(&base.root, "command"), vec!["Foo", "Bar"]);
}

#[test]
fn test_types_merge_into_single_container() {
    let mut base = doc(r#"<registry><types><type name="A"/></types></registry>"#);
    extend(&mut base, doc(r#"<registry><types><type name="B"/></types></registry>"#));
    assert_eq!(base.root.find_all("types").count(), 1);
    assert_eq!(names(base.root.find("types").unwrap(), "type"), vec!["A", "B"]);
}

#[test]
fn test_disjoint_supplement_is_appended_unchanged() {
    let mut base = doc(r#"<registry><types><type name="A"/></types></registry>"#);
    let supplement = doc(
        r#"<registry><tags><tag name="KHR" author="Khronos"/></tags><spirvextensions><spirvextension name="SPV_X"/></spirvextensions></registry>"#,
    );
    let expected: Vec<Element> = supplement.root.elements().cloned().collect();

    extend(&mut base, supplement);

    let merged: Vec<&Element> = base.root.elements().collect();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[1], &expected[0]);
    assert_eq!(merged[2], &expected[1]);
}

#[test]
fn test_every_leaf_tag_duplicates() {
    for tag in LEAF_TAGS {
        let xml = format!(r#"<registry><{tag} name="x"/></registry>"#);
        let mut base = doc(&xml);
        extend(&mut base, doc(&xml));
        assert_eq!(base.root.find_all(tag).count(), 2, "leaf tag {tag}");
    }
}

#[test]
fn test_repeated_extend_keeps_duplicating() {
    let supplement = r#"<registry><commands><command name="vkFoo"/></commands></registry>"#;
    let mut base = doc(r#"<registry><commands/></registry>"#);
    extend(&mut base, doc(supplement));
    extend(&mut base, doc(supplement));
    extend(&mut base, doc(supplement));
    assert_eq!(base.root.find("commands").unwrap().find_all("command").count(), 3);
}

#[test]
fn test_extend_from_path_with_debug_dump() {
    let ws = Workspace::new();
    let path = ws.config_file(
        "vendor.xml",
        r#"<registry><types><type name="VkVendorThing"/></types></registry>"#,
    );
    let mut base = Document::from_path(ws.root().join("vk.xml")).unwrap();
    let mut sink = MemoryDumpSink::default();

    extend_from_path(&mut base, &path, Some(&mut sink)).unwrap();

    let dumped = sink.get("vendor_merged.xml").unwrap();
    assert!(dumped.contains("VkVendorThing"));
    assert!(dumped.contains("vkDestroyInstance"));
    let reparsed = Document::parse_str(dumped).unwrap();
    assert_eq!(reparsed, base);
}

#[test]
fn test_extend_from_missing_path_is_filesystem_error() {
    let ws = Workspace::new();
    let mut base = Document::from_path(ws.root().join("vk.xml")).unwrap();
    let err = extend_from_path(&mut base, &ws.configs().join("absent.xml"), None).unwrap_err();
    assert!(matches!(err, GenError::Filesystem { .. }));
}
