//! Integration tests for name resolution and the assignment engine.

use std::collections::BTreeSet;

use look_assigner::prelude::*;
use look_assigner::resolve::resolve_all;
use proptest::prelude::*;

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn dressed_pool() -> Vec<LiveObject> {
    vec![
        LiveObject::with_materials("Obj1", &["old_MAT"]),
        LiveObject::with_materials("Obj2", &["old_MAT", "decal_MAT"]),
        LiveObject::with_materials("Obj3", &["other_MAT"]),
    ]
}

#[test]
fn test_resolve_documented_example() {
    let pool: Vec<LiveObject> = ["charA:Torso.002", "Torso", "Torso.1", "OtherTorso"]
        .iter()
        .map(|n| LiveObject::new(n))
        .collect();

    assert_eq!(resolve("Torso", &pool), set(&["charA:Torso.002", "Torso"]));
}

#[test]
fn test_resolve_dot_is_literal() {
    let pool: Vec<LiveObject> = ["A.B", "AxB", "A.B.001", "ns:A.B"]
        .iter()
        .map(|n| LiveObject::new(n))
        .collect();

    assert_eq!(resolve("A.B", &pool), set(&["A.B", "A.B.001", "ns:A.B"]));
}

#[test]
fn test_forced_replaces_everything() {
    let shaders = vec![ShaderRecord::standard("clay_MAT")];
    let mut pool = dressed_pool();

    let outcome = assign(&shaders, &mut pool, AssignMode::Forced).unwrap();
    assert!(matches!(outcome, AssignOutcome::Forced(_)));

    for obj in &pool {
        assert_eq!(obj.materials, ["clay_MAT"], "object {}", obj.name);
    }
}

#[test]
fn test_two_forced_shaders_conflict_without_mutation() {
    let shaders = vec![ShaderRecord::standard("clay_MAT"), ShaderRecord::standard("chrome_MAT")];
    let mut pool = dressed_pool();
    let before = pool.clone();

    let err = assign(&shaders, &mut pool, AssignMode::Forced).unwrap_err();
    assert!(matches!(err, Error::ConflictingAssignmentMode { count: 2 }));
    assert_eq!(pool, before);
}

#[test]
fn test_empty_batch_without_mutation() {
    let mut pool = dressed_pool();
    let before = pool.clone();

    let err = assign(&[], &mut pool, AssignMode::Pipeline).unwrap_err();
    assert!(matches!(err, Error::NoShadersSelected));
    assert_eq!(pool, before);
}

#[test]
fn test_pipeline_replaces_primary_slot_only() {
    let shaders = vec![ShaderRecord::pipelined("skin_MAT", &["Obj2"])];
    let mut pool = dressed_pool();

    assign(&shaders, &mut pool, AssignMode::Pipeline).unwrap();
    assert_eq!(pool[1].materials, ["skin_MAT", "decal_MAT"]);
    assert_eq!(pool[0].materials, ["old_MAT"]);
}

#[test]
fn test_pipeline_fills_empty_object() {
    let shaders = vec![ShaderRecord::pipelined("skin_MAT", &["Bare"])];
    let mut pool = vec![LiveObject::new("rig:Bare.001")];

    assign(&shaders, &mut pool, AssignMode::Pipeline).unwrap();
    assert_eq!(pool[0].materials, ["skin_MAT"]);
}

#[test]
fn test_pipeline_is_idempotent() {
    let shaders = vec![
        ShaderRecord::pipelined("skin_MAT", &["Obj1", "Obj2"]),
        ShaderRecord::pipelined("cloth_MAT", &["Obj3"]),
    ];

    let mut once = dressed_pool();
    assign(&shaders, &mut once, AssignMode::Pipeline).unwrap();

    let mut twice = dressed_pool();
    assign(&shaders, &mut twice, AssignMode::Pipeline).unwrap();
    assign(&shaders, &mut twice, AssignMode::Pipeline).unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice[1].materials.len(), 2);
}

#[test]
fn test_last_write_wins() {
    let shaders = vec![
        ShaderRecord::pipelined("S1", &["Obj1"]),
        ShaderRecord::pipelined("S2", &["Obj1"]),
    ];
    let mut pool = dressed_pool();

    let outcome = assign(&shaders, &mut pool, AssignMode::Pipeline).unwrap();
    assert_eq!(pool[0].primary_material(), Some("S2"));

    let reports = outcome.reports();
    assert_eq!(reports[0].shader_name, "S1");
    assert_eq!(reports[0].resolved_objects, set(&["Obj1"]));
    assert_eq!(reports[1].resolved_objects, set(&["Obj1"]));
}

#[test]
fn test_unresolved_target_reported() {
    let shaders = vec![ShaderRecord::pipelined("ghost_MAT", &["Ghost"])];
    let mut pool = dressed_pool();
    let before = pool.clone();

    let outcome = assign(&shaders, &mut pool, AssignMode::Pipeline).unwrap();
    let report = &outcome.reports()[0];
    assert_eq!(report.unresolved_targets, set(&["Ghost"]));
    assert!(report.resolved_objects.is_empty());
    assert!(!report.is_complete());
    assert_eq!(pool, before);
}

#[test]
fn test_oversized_target_does_not_block_batch() {
    let shaders = vec![ShaderRecord::pipelined("skin_MAT", &["A".repeat(2_000_000), "Obj1".to_string()])];
    let mut pool = dressed_pool();

    let outcome = assign(&shaders, &mut pool, AssignMode::Pipeline).unwrap();
    assert_eq!(pool[0].materials, ["skin_MAT"]);

    let report = &outcome.reports()[0];
    assert_eq!(report.resolved_objects, set(&["Obj1"]));
    assert_eq!(report.unresolved_targets.len(), 1);
}

#[test]
fn test_standard_shaders_returned_untouched() {
    let shaders = vec![
        ShaderRecord::standard("floor_MAT"),
        ShaderRecord::pipelined("skin_MAT", &["Obj1"]),
        ShaderRecord::from_raw_targets("empty_MAT", ""),
    ];
    let mut pool = dressed_pool();

    let outcome = assign(&shaders, &mut pool, AssignMode::Pipeline).unwrap();
    let standard: Vec<&str> = outcome.standard().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(standard, ["floor_MAT"]);

    // The empty-attribute shader is pipelined and reports nothing.
    let reports = outcome.reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].shader_name, "empty_MAT");
    assert!(reports[1].resolved_objects.is_empty());
    assert!(reports[1].unresolved_targets.is_empty());
}

#[test]
fn test_namespaced_duplicates_all_receive_shader() {
    let shaders = vec![ShaderRecord::from_raw_targets("skin_MAT", "Torso, Head")];
    let mut pool = vec![
        LiveObject::new("charA:Torso"),
        LiveObject::new("charB:Torso.001"),
        LiveObject::new("charA:Head"),
        LiveObject::new("charA:Hat"),
    ];

    let outcome = assign(&shaders, &mut pool, AssignMode::Pipeline).unwrap();
    assert_eq!(
        outcome.reports()[0].resolved_objects,
        set(&["charA:Torso", "charB:Torso.001", "charA:Head"])
    );
    assert!(pool[3].materials.is_empty());
}

#[test]
fn test_separator_in_name_is_known_limitation() {
    // "Hat, Left" was one object at publish time; the joined encoding
    // cannot tell, so it is looked up as two names.
    let record = ShaderRecord::from_raw_targets("felt_MAT", "Hat, Left");
    let pool = vec![LiveObject::new("Hat, Left")];

    let resolution = resolve_all(record.targets(), &pool);
    assert!(resolution.resolved.is_empty());
    assert_eq!(resolution.unresolved, set(&["Hat", "Left"]));

    // Pre-split targets do not have the problem.
    let record = ShaderRecord::pipelined("felt_MAT", &["Hat, Left"]);
    let resolution = resolve_all(record.targets(), &pool);
    assert_eq!(resolution.resolved, set(&["Hat, Left"]));
}

/// Strip at most one namespace prefix and one `.NNN` suffix.
fn reduce(name: &str) -> Vec<String> {
    let mut forms = vec![name.to_string()];
    let stripped_ns = name
        .split_once(':')
        .filter(|(ns, _)| !ns.is_empty() && ns.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .map(|(_, rest)| rest.to_string());
    if let Some(rest) = &stripped_ns {
        forms.push(rest.clone());
    }
    for form in forms.clone() {
        if form.len() > 4 {
            let (head, tail) = form.split_at(form.len() - 4);
            if tail.starts_with('.') && tail[1..].chars().all(|c| c.is_ascii_digit()) {
                forms.push(head.to_string());
            }
        }
    }
    forms
}

proptest! {
    #[test]
    fn prop_mangled_names_resolve(
        recorded in "[A-Za-z][A-Za-z0-9_ .]{0,12}",
        namespace in proptest::option::of("[A-Za-z0-9_]{1,6}"),
        suffix in proptest::option::of(0u16..1000),
    ) {
        let mut live = recorded.clone();
        if let Some(ns) = &namespace {
            live = format!("{}:{}", ns, live);
        }
        if let Some(n) = suffix {
            live = format!("{}.{:03}", live, n);
        }
        let pool = vec![LiveObject::new(&live), LiveObject::new(&format!("x{}", recorded))];

        let matches = resolve(&recorded, &pool);
        prop_assert!(matches.contains(&live));
    }

    #[test]
    fn prop_matches_are_pool_subset_and_reduce(
        recorded in "[A-Za-z][A-Za-z0-9_.]{0,8}",
        names in proptest::collection::vec("([a-z]{1,3}:)?[A-Za-z][A-Za-z0-9_.]{0,8}", 0..12),
    ) {
        let pool: Vec<LiveObject> = names.iter().map(|n| LiveObject::new(n)).collect();
        let matches = resolve(&recorded, &pool);

        for m in &matches {
            prop_assert!(names.contains(m));
            prop_assert!(reduce(m).contains(&recorded), "{} does not reduce to {}", m, recorded);
        }
    }
}
