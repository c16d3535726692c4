//! Integration tests for the Compiler API
//!
//! These tests run the full pipeline from JSON source to laid-out container.

use serde_json::{Value, json};

use mosaic::{
    Compiler, ErrorCode, ErrorKind, MosaicError,
    config::{AppConfig, LayoutConfig},
    element::LayoutAlgorithm,
};

fn compile(source: Value) -> Result<Value, MosaicError> {
    let compiler = Compiler::default();
    let container = compiler.compile_str(&source.to_string())?;
    let json = compiler.render_json(&container, false)?;
    Ok(serde_json::from_str(&json).unwrap())
}

fn find<'a>(output: &'a Value, id: &str) -> &'a Value {
    fn search<'a>(nodes: &'a Value, id: &str) -> Option<&'a Value> {
        nodes.as_array()?.iter().find_map(|node| {
            if node["props"]["id"] == id {
                Some(node)
            } else {
                search(&node["children"], id)
            }
        })
    }
    search(&output["children"], id).unwrap_or_else(|| panic!("no node `{id}`"))
}

fn xy(output: &Value, id: &str) -> (f64, f64) {
    let props = &find(output, id)["props"];
    (props["x"].as_f64().unwrap(), props["y"].as_f64().unwrap())
}

#[test]
fn test_end_to_end_example() {
    let output = compile(json!({ "children": [
        { "kind": "mind-map", "props": { "id": "ideas", "spacing": 60 }, "children": [
            { "kind": "mind-map-node", "props": { "id": "1" } },
            { "kind": "mind-map-node", "props": { "id": "2", "from": "1" } },
            { "kind": "connector", "props": { "from": "1", "to": "2" } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(xy(&output, "1"), (0.0, 0.0));
    assert_eq!(xy(&output, "2"), (200.0, 0.0));
    assert_eq!(
        output["children"][0]["children"][2],
        json!({ "kind": "connector", "props": { "from": "1", "to": "2" } })
    );
}

#[test]
fn test_compile_is_deterministic() {
    let source = json!({ "children": [
        { "kind": "embed", "props": { "scope": "team" }, "children": [
            { "kind": "mind-map", "props": { "id": "plan", "layout": "radial" }, "children": [
                { "kind": "mind-map-node", "props": { "id": "hub" } },
                { "kind": "mind-map-node", "props": { "id": "a", "from": "hub" } },
                { "kind": "mind-map-node", "props": { "id": "b", "from": "hub" } },
                { "kind": "mind-map-node", "props": { "id": "c", "from": "hub" } }
            ] }
        ] },
        { "kind": "mind-map", "props": { "id": "other", "anchor": "team.plan", "position": "right" }, "children": [
            { "kind": "mind-map-node", "props": { "id": "x" } }
        ] }
    ] })
    .to_string();

    let compiler = Compiler::default();
    let first = compiler
        .render_json(&compiler.compile_str(&source).unwrap(), true)
        .unwrap();
    let second = compiler
        .render_json(&compiler.compile_str(&source).unwrap(), true)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cycle_rejected_without_coordinates() {
    let err = compile(json!({ "children": [
        { "kind": "mind-map", "props": { "id": "m" }, "children": [
            { "kind": "mind-map-node", "props": { "id": "A", "from": "C" } },
            { "kind": "mind-map-node", "props": { "id": "B", "from": "A" } },
            { "kind": "mind-map-node", "props": { "id": "C", "from": "B" } }
        ] }
    ] }))
    .unwrap_err();

    let diagnostic = err.diagnostic().unwrap();
    assert_eq!(diagnostic.code(), Some(ErrorCode::E300));
    assert_eq!(diagnostic.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("mind-map `m` contains a cycle"));
    // Layout diagnostics have no JSON pointer to report.
    assert!(diagnostic.label().is_none());
}

#[test]
fn test_bidirectional_split() {
    let output = compile(json!({ "children": [
        { "kind": "mind-map", "props": { "id": "m", "layout": "bidirectional" }, "children": [
            { "kind": "mind-map-node", "props": { "id": "root" } },
            { "kind": "mind-map-node", "props": { "id": "c1", "from": "root" } },
            { "kind": "mind-map-node", "props": { "id": "c2", "from": "root" } },
            { "kind": "mind-map-node", "props": { "id": "c3", "from": "root" } },
            { "kind": "mind-map-node", "props": { "id": "c4", "from": "root" } },
            { "kind": "mind-map-node", "props": { "id": "c5", "from": "root" } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(xy(&output, "root"), (0.0, 0.0));
    let left = ["c1", "c2", "c3", "c4", "c5"]
        .iter()
        .filter(|id| xy(&output, id).0 < 0.0)
        .count();
    assert_eq!(left, 3);
}

#[test]
fn test_empty_canvas_is_a_no_op() {
    let plain = compile(json!({ "children": [
        { "kind": "shape", "props": { "id": "s", "x": 1, "y": 2 } }
    ] }))
    .unwrap();
    let wrapped = compile(json!({ "children": [
        { "kind": "canvas", "children": [
            { "kind": "shape", "props": { "id": "s", "x": 1, "y": 2 } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(plain, wrapped);
}

#[test]
fn test_anchor_falls_back_to_literal() {
    let output = compile(json!({ "children": [
        { "kind": "shape", "props": { "id": "header", "x": 0, "y": 0 } },
        { "kind": "embed", "props": { "scope": "card" }, "children": [
            { "kind": "text", "props": { "id": "title", "anchor": "header", "position": "bottom" } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(find(&output, "card.title")["props"]["anchor"], "header");
}

#[test]
fn test_cross_scope_reference_passes_through() {
    let output = compile(json!({ "children": [
        { "kind": "embed", "props": { "scope": "a" }, "children": [
            { "kind": "connector", "props": { "from": "x", "to": "b.y:in" } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(
        output["children"][0]["props"],
        json!({ "from": "a.x", "to": "b.y:in" })
    );
}

#[test]
fn test_regions_composed_in_a_row() {
    let output = compile(json!({ "children": [
        { "kind": "mind-map", "props": { "id": "first" }, "children": [
            { "kind": "mind-map-node", "props": { "id": "a" } },
            { "kind": "mind-map-node", "props": { "id": "a1", "from": "a" } }
        ] },
        { "kind": "mind-map", "props": { "id": "second" }, "children": [
            { "kind": "mind-map-node", "props": { "id": "b" } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(xy(&output, "a"), (0.0, 0.0));
    assert_eq!(xy(&output, "a1"), (200.0, 0.0));
    assert_eq!(xy(&output, "b"), (550.0, 0.0));
}

#[test]
fn test_anchored_region() {
    let output = compile(json!({ "children": [
        { "kind": "mind-map", "props": { "id": "below", "anchor": "top", "position": "bottom", "gap": 20 }, "children": [
            { "kind": "mind-map-node", "props": { "id": "b" } }
        ] },
        { "kind": "mind-map", "props": { "id": "top", "x": 100, "y": 100 }, "children": [
            { "kind": "mind-map-node", "props": { "id": "t" } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(xy(&output, "t"), (100.0, 100.0));
    assert_eq!(xy(&output, "b"), (100.0, 170.0));
}

#[test]
fn test_region_anchor_cycle() {
    let err = compile(json!({ "children": [
        { "kind": "mind-map", "props": { "id": "a", "anchor": "b", "position": "right" }, "children": [
            { "kind": "mind-map-node", "props": { "id": "a1" } }
        ] },
        { "kind": "mind-map", "props": { "id": "b", "anchor": "a", "position": "left" }, "children": [
            { "kind": "mind-map-node", "props": { "id": "b1" } }
        ] }
    ] }))
    .unwrap_err();

    let diagnostic = err.diagnostic().unwrap();
    assert_eq!(diagnostic.code(), Some(ErrorCode::E302));
    assert!(diagnostic.label().is_none());
    assert!(err.to_string().contains("cycle through `a`"));
}

#[test]
fn test_config_changes_default_algorithm() {
    let config = AppConfig::new(LayoutConfig::default().with_algorithm(LayoutAlgorithm::Bidirectional));
    let compiler = Compiler::new(config);
    let container = compiler
        .compile_str(
            &json!({ "children": [
                { "kind": "mind-map", "props": { "id": "m" }, "children": [
                    { "kind": "mind-map-node", "props": { "id": "r" } },
                    { "kind": "mind-map-node", "props": { "id": "l", "from": "r" } },
                    { "kind": "mind-map-node", "props": { "id": "q", "from": "r" } }
                ] }
            ] })
            .to_string(),
        )
        .unwrap();
    let output: Value = serde_json::from_str(&compiler.render_json(&container, false).unwrap()).unwrap();

    assert_eq!(xy(&output, "l"), (-200.0, 0.0));
    assert_eq!(xy(&output, "q"), (200.0, 0.0));
}

#[test]
fn test_invalid_json_is_json_error() {
    let err = Compiler::default().compile_str("{ not json").unwrap_err();
    assert!(matches!(err, MosaicError::Json(_)));
    assert!(err.diagnostic().is_none());
}

#[test]
fn test_validation_error_carries_pointer() {
    let err = compile(json!({ "children": [
        { "kind": "image", "props": { "id": "pic", "x": 0, "y": 0 } }
    ] }))
    .unwrap_err();

    let diagnostic = err.diagnostic().unwrap();
    assert_eq!(diagnostic.code(), Some(ErrorCode::E101));
    assert_eq!(diagnostic.label().unwrap().pointer(), "/children/0");
}

#[test]
fn test_huge_region_offset_stays_numeric() {
    let output = compile(json!({ "children": [
        { "kind": "mind-map", "props": { "id": "far", "x": 1e306, "y": 0 }, "children": [
            { "kind": "mind-map-node", "props": { "id": "a" } }
        ] }
    ] }))
    .unwrap();

    assert_eq!(xy(&output, "a"), (1e306, 0.0));
}
