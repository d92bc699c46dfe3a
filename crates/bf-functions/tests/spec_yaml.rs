//! Function specs read from YAML the way input files write them.

use bf_functions::{FunctionKind, FunctionSpec, ScalarFunction};
use nalgebra::Point3;
use std::collections::BTreeMap;

fn load(src: &str) -> BTreeMap<String, FunctionSpec> {
    serde_yaml::from_str(src).unwrap()
}

#[test]
fn untagged_variants_resolve() {
    let specs = load(
        r#"
base_velocity: "{-y}{x}{0}"
chord_length: 0.25
local_vertical: [0, 0, 1]
drag:
  table: [[-1.0, 0.5], [1.0, 1.5]]
lift: "if(abs(t) < 0.3, 2*pi*t, 0)"
"#,
    );

    assert!(matches!(specs["base_velocity"], FunctionSpec::Expression(_)));
    assert!(matches!(specs["chord_length"], FunctionSpec::Constant(_)));
    assert!(matches!(specs["local_vertical"], FunctionSpec::Vector(_)));
    assert!(matches!(specs["drag"], FunctionSpec::Table { .. }));

    let p = Point3::new(3.0, 4.0, 0.0);
    let mut out = [0.0; 3];

    specs["base_velocity"].build().unwrap().eval_into(&p, 0.0, &mut out);
    assert_eq!(out, [-4.0, 3.0, 0.0]);

    specs["local_vertical"].build().unwrap().eval_into(&p, 0.0, &mut out);
    assert_eq!(out, [0.0, 0.0, 1.0]);

    let drag = specs["drag"].build().unwrap();
    assert!((drag.eval(&p, 0.0) - 1.0).abs() < 1e-14);

    let lift = specs["lift"].build().unwrap();
    assert!((lift.eval(&p, 0.1) - 0.2 * std::f64::consts::PI).abs() < 1e-14);
    assert_eq!(lift.eval(&p, 0.5), 0.0);
}

#[test]
fn yaml_zero_is_the_text_sentinel() {
    let specs = load("lift: 0\naoa: \"0\"\n");
    assert!(specs["lift"].is_sentinel("0"));
    assert!(specs["aoa"].is_sentinel("0"));
    assert!(!specs["aoa"].is_sentinel("00000"));
}

#[test]
fn built_functions_evaluate_across_threads() {
    let f = FunctionKind::parse("x*t").unwrap();
    let shared = std::sync::Arc::new(f);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let f = shared.clone();
            std::thread::spawn(move || f.eval(&Point3::new(i as f64, 0.0, 0.0), 2.0))
        })
        .collect();
    let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![0.0, 2.0, 4.0, 6.0]);
}
