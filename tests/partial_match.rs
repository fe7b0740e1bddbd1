use malh::{QueryError, Relation, RelationConfig, SplitPolicy, Tuple};
use std::collections::HashMap;
use tempfile::tempdir;

fn three_attr_config() -> RelationConfig {
    RelationConfig {
        attr_count: 3,
        initial_pages: 4,
        initial_depth: 2,
        choice_vector: "0,0:1,0:2,0:0,1:1,1:2,1".into(),
        split: SplitPolicy::Never,
    }
}

fn dataset() -> Vec<Tuple> {
    let colors = ["red", "green", "blue", "amber"];
    let sizes = ["small", "medium", "large"];
    let mut tuples = Vec::new();
    let mut id = 100;
    for color in colors {
        for size in sizes {
            for _ in 0..3 {
                tuples.push(Tuple {
                    fields: vec![color.into(), size.into(), id.to_string()],
                });
                id += 1;
            }
        }
    }
    tuples
}

fn populate(rel: &mut Relation, tuples: &[Tuple]) {
    for t in tuples {
        rel.insert(t).unwrap();
    }
}

// every result matches the pattern, and every inserted tuple that matches
// the pattern shows up exactly once
fn check_pattern(rel: &mut Relation, tuples: &[Tuple], pattern: &str) {
    let want = Tuple::parse(pattern, rel.attr_count()).unwrap();
    let mut expected: HashMap<String, u32> = HashMap::new();
    for t in tuples.iter().filter(|t| t.matches(&want)) {
        *expected.entry(t.serialize()).or_default() += 1;
    }

    let mut got: HashMap<String, u32> = HashMap::new();
    for t in rel.scan(pattern).unwrap() {
        let t = t.unwrap();
        assert!(t.matches(&want), "scan for {pattern:?} returned {:?}", t.serialize());
        *got.entry(t.serialize()).or_default() += 1;
    }
    assert_eq!(got, expected, "scan for {pattern:?}");
}

#[test]
fn test_exact_and_partial_patterns_against_filter() {
    let dir = tempdir().unwrap();
    let mut rel = Relation::create(dir.path(), "parts", &three_attr_config()).unwrap();
    let tuples = dataset();
    populate(&mut rel, &tuples);

    for pattern in [
        "red,small,100",
        "red,small,?",
        "green,?,?",
        "?,medium,?",
        "?,?,111",
        "blue,?,118",
        "?,?,?",
        "violet,?,?",
        "red,large,999",
    ] {
        check_pattern(&mut rel, &tuples, pattern);
    }
}

#[test]
fn test_patterns_still_complete_after_splits() {
    let dir = tempdir().unwrap();
    let mut rel = Relation::create(dir.path(), "parts", &three_attr_config()).unwrap();
    let tuples = dataset();
    populate(&mut rel, &tuples);

    // push the relation through a partial expansion, then a full doubling
    for _ in 0..3 {
        rel.split().unwrap();
    }
    assert_eq!((rel.depth(), rel.split_pointer()), (2, 3));

    for pattern in ["amber,?,?", "?,small,?", "?,?,125", "?,?,?"] {
        check_pattern(&mut rel, &tuples, pattern);
    }

    rel.split().unwrap();
    assert_eq!((rel.depth(), rel.split_pointer()), (3, 0));

    for pattern in ["amber,?,?", "?,small,?", "?,?,125", "?,?,?"] {
        check_pattern(&mut rel, &tuples, pattern);
    }
}

#[test]
fn test_unknown_bits_fan_out_candidates() {
    let dir = tempdir().unwrap();
    let mut rel = Relation::create(dir.path(), "parts", &three_attr_config()).unwrap();
    let tuples = dataset();
    populate(&mut rel, &tuples);

    // first two address bits come from attrs 0 and 1; fixing both pins the
    // scan to a single bucket, leaving one open doubles the candidates
    let exact: Vec<Tuple> = rel
        .scan("red,small,100")
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(exact.len(), 1);

    let wide: Vec<Tuple> = rel.scan("?,?,?").unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(wide.len(), tuples.len());
}

#[test]
fn test_scan_rejects_wrong_field_count() {
    let dir = tempdir().unwrap();
    let mut rel = Relation::create(dir.path(), "parts", &three_attr_config()).unwrap();

    match rel.scan("red,small").map(|_| ()) {
        Err(QueryError::WrongFieldCount { got, want }) => {
            assert_eq!((got, want), (2, 3));
        }
        other => panic!("expected WrongFieldCount, got {other:?}"),
    }
    match rel.scan("a,b,c,d").map(|_| ()) {
        Err(QueryError::WrongFieldCount { got, want }) => {
            assert_eq!((got, want), (4, 3));
        }
        other => panic!("expected WrongFieldCount, got {other:?}"),
    }
}
