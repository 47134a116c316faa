//! End-to-end tests: JSON statement trees in, geometry out

mod common;

use common::{compute_layout, digits};
use pretty_assertions::assert_eq;
use sequence_layout::ir::{Diagram, Fragment, Statement};
use sequence_layout::layout::{HorizontalLayout, ParticipantOrder, VerticalStacker};
use sequence_layout::{layout_json, EngineError, InputError, LayoutError, LayoutMetrics, Theme};

fn summary(diagram: &Diagram) -> String {
    let result = compute_layout(diagram);
    result
        .statements
        .iter()
        .map(|(id, c)| format!("{} top={} h={}", id, c.top, c.height))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_json_tree_layout() {
    let source = r#"{
        "title": "Checkout",
        "participants": [{"name": "Client"}, {"name": "Api", "label": "Api200"}],
        "root": [
            {"type": "message", "kind": "sync", "from": "Client", "to": "Api",
             "signature": "pay", "assignee": "receipt",
             "block": [
                {"type": "message", "kind": "creation", "to": "Order", "assignee": "order"},
                {"type": "message", "kind": "return", "signature": "ok"}
             ]}
        ]
    }"#;
    let result = layout_json(source, &digits, &LayoutMetrics::default()).unwrap();

    let names: Vec<&str> = result.participants.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Client", "Api", "Order"]);
    // 40 + 12 for Client, 100 + 12 for the wide Api box
    assert_eq!(result.participants["Api"].center, 164.0);

    let call = result.statement("0").unwrap();
    assert_eq!(call.top, 40.0 + 72.0);
    assert!(call.anchors.ret.is_some());
    assert_eq!(result.creations["Order"], 112.0 + 31.0);

    let ret = result.statement("0.1").unwrap().message.clone().unwrap();
    assert_eq!((ret.from.as_str(), ret.to.as_str()), ("Api", "Client"));

    let json = result.to_json_pretty().unwrap();
    assert!(json.contains("\"0.1\""));
    assert!(json.contains("\"return\""));
}

#[test]
fn test_statement_coordinates_snapshot() {
    let diagram = Diagram::new(
        vec![
            Statement::sync("A", "a"),
            Statement::fragment(
                Fragment::alt("x", vec![Statement::sync("B", "b")])
                    .otherwise(vec![Statement::ret("r")]),
            ),
        ]
        .into(),
    );
    insta::assert_snapshot!(summary(&diagram), @r"
    0 top=72 h=55
    1 top=128 h=184
    1.0.0 top=173 h=55
    1.1.0 top=248 h=54
    ");
}

#[test]
fn test_unknown_participant_suggests_close_names() {
    let metrics = LayoutMetrics::default();
    let order = ParticipantOrder::from_names(["_STARTER_", "Alice"]);
    let horizontal = HorizontalLayout::solve(&order, &[], &digits, &metrics).unwrap();
    let diagram = Diagram::new(vec![Statement::sync_from("Alice", "Alce", "m")].into());

    let err = VerticalStacker::new(&horizontal, &digits, &metrics)
        .layout(&diagram)
        .unwrap_err();
    assert_eq!(err.suggestions(), Some(&["Alice".to_string()][..]));
    insta::assert_snapshot!(err.to_string(), @"participant 'Alce' not found (did you mean Alice?)");
}

#[test]
fn test_invalid_json_reports_location() {
    let source = "{\n  \"root\": [\n    {\"type\": \"message\", \"kind\": \"shout\"}\n  ]\n}";
    let err = layout_json(source, &digits, &LayoutMetrics::default()).unwrap_err();
    match err {
        EngineError::Input(input) => {
            assert!(matches!(input, InputError::Json { line: 3, .. }));
            let report = input.format(source, "broken.json");
            assert!(report.contains("broken.json"));
        }
        EngineError::Layout(e) => panic!("expected input error, got {}", e),
    }
}

#[test]
fn test_theme_metrics_change_layout() {
    let theme = Theme::from_str(
        r#"
[metadata]
name = "tight"

[metrics]
margin = 0.0
statement_margin = 0.0
"#,
    )
    .unwrap();
    let source = r#"{"root": [
        {"type": "message", "kind": "sync", "to": "A", "signature": "m"},
        {"type": "message", "kind": "sync", "to": "A", "signature": "n"}
    ]}"#;
    let result = layout_json(source, &digits, &theme.metrics).unwrap();
    assert_eq!(result.participants["A"].center, 80.0);
    assert_eq!(result.statement("1").unwrap().top, 72.0 + 55.0);
}

#[test]
fn test_empty_tree_is_empty_layout() {
    let result = layout_json("{}", &digits, &LayoutMetrics::default()).unwrap();
    assert_eq!(result.width, 0.0);
    assert!(result.participants.is_empty());
    assert!(result.statements.is_empty());
}

#[test]
fn test_layout_error_is_not_input_error() {
    let err: EngineError = LayoutError::SolverDidNotConverge { passes: 3 }.into();
    assert_eq!(
        err.to_string(),
        "layout error: horizontal constraints did not converge after 3 passes"
    );
}
