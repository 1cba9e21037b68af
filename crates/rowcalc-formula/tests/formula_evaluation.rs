//! End-to-end tests for formula evaluation over an in-memory table

use pretty_assertions::assert_eq;
use rowcalc_core::{ColumnType, DerivedColumn, DerivedRegistry, ErrorKind, Frame, Scalar};
use rowcalc_formula::{
    add_column, canonical, parse, run, AddColumnOptions, DependencyResolver, FormulaError,
};

fn sales_frame() -> Frame {
    let mut frame = Frame::new();
    frame.push_number_column("price", &[100.0, 250.0, 40.0, 0.0]);
    frame.push_number_column("qty", &[2.0, 1.0, 5.0, 3.0]);
    frame.push_text_column("region", &["north", "south", "north", "east"]);
    frame
}

/// Test arithmetic, comparison, and concatenation end to end
#[test]
fn test_run_simple_formulas() {
    let frame = sales_frame();
    let registry = DerivedRegistry::new();

    let cells = run("=price*qty", &frame, &registry).unwrap();
    assert_eq!(
        cells,
        vec![
            Scalar::Number(200.0),
            Scalar::Number(250.0),
            Scalar::Number(200.0),
            Scalar::Number(0.0),
        ]
    );

    let cells = run("=price>=100", &frame, &registry).unwrap();
    assert_eq!(
        cells,
        vec![
            Scalar::Bool(true),
            Scalar::Bool(true),
            Scalar::Bool(false),
            Scalar::Bool(false),
        ]
    );

    let cells = run("=region & \"!\"", &frame, &registry).unwrap();
    assert_eq!(cells[0], Scalar::Text("north!".into()));
}

/// Test that row-level math errors land as in-place sentinels
#[test]
fn test_run_error_sentinels_per_row() {
    let frame = sales_frame();
    let registry = DerivedRegistry::new();

    let cells = run("=qty/price", &frame, &registry).unwrap();
    assert_eq!(cells[0], Scalar::Number(0.02));
    assert_eq!(cells[3], Scalar::Error(ErrorKind::Div0));
}

/// Test IF elementwise selection and AND's flattening reduction
#[test]
fn test_run_logical_functions() {
    let frame = sales_frame();
    let registry = DerivedRegistry::new();

    let cells = run("=IF(price>50, \"big\", \"small\")", &frame, &registry).unwrap();
    assert_eq!(
        cells,
        vec![
            Scalar::Text("big".into()),
            Scalar::Text("big".into()),
            Scalar::Text("small".into()),
            Scalar::Text("small".into()),
        ]
    );

    // AND flattens every cell of every argument into one scalar verdict
    let cells = run("=AND(qty>0)", &frame, &registry).unwrap();
    assert_eq!(cells, vec![Scalar::Bool(true); 4]);
    let cells = run("=AND(price>0)", &frame, &registry).unwrap();
    assert_eq!(cells, vec![Scalar::Bool(false); 4]);
}

/// Test materializing a formula as a typed column, then referencing it
#[test]
fn test_add_column_then_reference() {
    let mut frame = sales_frame();
    let registry = DerivedRegistry::new();

    let materialized = add_column(
        &mut frame,
        &registry,
        "=price*qty",
        &AddColumnOptions {
            name: Some("revenue".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(materialized.column_type, ColumnType::Int);
    assert_eq!(materialized.canonical, "=price*qty");

    let cells = run("=revenue/2", &frame, &registry).unwrap();
    assert_eq!(cells[0], Scalar::Number(100.0));
}

/// Test derived aliases: registration, evaluation through the target
/// column, canonical expansion, and dependency resolution
#[test]
fn test_derived_column_lifecycle() {
    let mut frame = sales_frame();
    let mut registry = DerivedRegistry::new();

    let formula = "= price * qty ";
    let parsed = parse(formula).unwrap();
    let canonical_text = canonical(&parsed.tokens, &registry).unwrap();
    assert_eq!(canonical_text, "=price*qty");

    let materialized = add_column(
        &mut frame,
        &registry,
        formula,
        &AddColumnOptions::default(),
    )
    .unwrap();
    registry
        .insert(DerivedColumn::new(
            "derived_revenue",
            &materialized.name,
            formula,
            &canonical_text,
            materialized.column_type,
        ))
        .unwrap();

    // Both reference forms read the materialized target column
    let via_bracket = run("=[revenue]+1", &frame, &registry).unwrap();
    let via_prefix = run("=derived_revenue+1", &frame, &registry).unwrap();
    assert_eq!(via_bracket, via_prefix);
    assert_eq!(via_bracket[0], Scalar::Number(201.0));

    // Canonical text expands the alias in place
    let parsed = parse("=[revenue]>100").unwrap();
    assert_eq!(
        canonical(&parsed.tokens, &registry).unwrap(),
        "=price*qty>100"
    );

    // Resolution reaches the base columns and repeats stably
    let resolver = DependencyResolver::new(&registry);
    let deps = resolver.resolve("=[revenue]+qty").unwrap();
    assert!(deps.base_columns.contains("price"));
    assert!(deps.base_columns.contains("qty"));
    assert!(deps.derived_columns.contains("derived_revenue"));
    assert_eq!(resolver.resolve("=[revenue]+qty").unwrap(), deps);
}

/// Test that structural failures carry the formula text and never
/// produce a partial result
#[test]
fn test_structural_failures_name_the_formula() {
    let frame = sales_frame();
    let registry = DerivedRegistry::new();

    let err = run("=(price+1", &frame, &registry).unwrap_err();
    match &err {
        FormulaError::InFormula { formula, .. } => assert_eq!(formula, "=(price+1"),
        other => panic!("expected wrapped error, got {other:?}"),
    }
    assert!(matches!(err.root_cause(), FormulaError::Unbalanced));

    let err = run("=ghost+1", &frame, &registry).unwrap_err();
    match err.root_cause() {
        FormulaError::UnknownColumn(name) => assert_eq!(name, "ghost"),
        other => panic!("expected unknown column, got {other:?}"),
    }
}

/// Test aggregate and text functions over whole columns
#[test]
fn test_aggregates_and_text_functions() {
    let frame = sales_frame();
    let registry = DerivedRegistry::new();

    // Aggregates collapse to a scalar, then fill every row
    let cells = run("=SUM(price)", &frame, &registry).unwrap();
    assert_eq!(cells, vec![Scalar::Number(390.0); 4]);
    let cells = run("=MAX(price)-MIN(price)", &frame, &registry).unwrap();
    assert_eq!(cells, vec![Scalar::Number(250.0); 4]);

    let cells = run("=UPPER(region)", &frame, &registry).unwrap();
    assert_eq!(cells[1], Scalar::Text("SOUTH".into()));

    // A sentinel anywhere among the flattened cells becomes the
    // aggregate's own value, not an evaluation failure
    let cells = run("=SUM(qty/price)", &frame, &registry).unwrap();
    assert_eq!(cells, vec![Scalar::Error(ErrorKind::Div0); 4]);
}
