use dagic_core::{
    compute_information_content, tsv_field, Dag, MatrixOptions, MatrixStats, SimilarityError,
    SimilarityMatrix, Term, MATRIX_HEADER,
};

/// ```text
/// r ─┬─ a ─┬─ c ─┐
///    │     └─ d ─┴─ g
///    ├─ b ─┬─ d
///    │     └─ e
///    └─ f
/// ```
fn fixture() -> Dag {
    let mut dag = Dag::new();
    for id in ["r", "a", "b", "c", "d", "e", "f", "g"] {
        dag.add_term(Term::new(id, format!("term {id}"))).unwrap();
    }
    for (p, c) in [
        ("r", "a"),
        ("r", "b"),
        ("r", "f"),
        ("a", "c"),
        ("a", "d"),
        ("b", "d"),
        ("b", "e"),
        ("c", "g"),
        ("d", "g"),
    ] {
        dag.add_edge(p, c).unwrap();
    }
    compute_information_content(&mut dag).unwrap();
    dag
}

fn run(dag: &Dag, options: MatrixOptions) -> (MatrixStats, Vec<Vec<String>>) {
    let matrix = SimilarityMatrix::new(dag, options).unwrap();
    let mut buf = Vec::new();
    let stats = matrix.write_tsv(&mut buf).unwrap();

    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(MATRIX_HEADER));
    let rows = lines
        .map(|l| l.split('\t').map(str::to_string).collect())
        .collect();
    (stats, rows)
}

/// (nodeA, nodeB, mica) triples from parsed rows.
fn triples(rows: &[Vec<String>]) -> Vec<(String, String, String)> {
    rows.iter()
        .map(|r| (r[0].clone(), r[2].clone(), r[4].clone()))
        .collect()
}

fn triple(a: &str, b: &str, m: &str) -> (String, String, String) {
    (a.to_string(), b.to_string(), m.to_string())
}

#[test]
fn test_full_matrix_skips_zero_similarity() {
    let dag = fixture();
    let (stats, rows) = run(&dag, MatrixOptions::default());

    assert_eq!(
        stats,
        MatrixStats {
            pairs: 28,
            rows: 11,
            zero: 17,
            errors: 0,
        }
    );
    assert_eq!(rows.len(), 11);
    assert!(rows.iter().all(|r| r.len() == 7));
    assert!(rows.iter().all(|r| r[4] != "r"));

    let found = triples(&rows);
    assert!(found.contains(&triple("c", "d", "a")));
    assert!(found.contains(&triple("d", "g", "d")));
    assert!(found.contains(&triple("e", "g", "b")));
}

#[test]
fn test_each_pair_emitted_once() {
    let dag = fixture();
    let (_, rows) = run(
        &dag,
        MatrixOptions {
            include_zero: true,
            ..MatrixOptions::default()
        },
    );

    assert_eq!(rows.len(), 28);
    let mut pairs: Vec<(String, String)> = rows
        .iter()
        .map(|r| {
            let (a, b) = (r[0].clone(), r[2].clone());
            if a < b { (a, b) } else { (b, a) }
        })
        .collect();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), 28);
}

#[test]
fn test_single_row_mode() {
    let dag = fixture();
    let (stats, rows) = run(
        &dag,
        MatrixOptions {
            node: Some("d".to_string()),
            ..MatrixOptions::default()
        },
    );

    assert_eq!(stats.pairs, 7);
    assert_eq!(stats.zero, 2);
    assert_eq!(stats.rows, 5);
    assert!(rows.iter().all(|r| r[0] == "d" && r[2] != "d"));
    assert!(triples(&rows).contains(&triple("d", "c", "a")));
}

#[test]
fn test_skip_and_nmax_window() {
    let dag = fixture();
    let options = MatrixOptions {
        skip: 3,
        nmax: Some(2),
        ..MatrixOptions::default()
    };
    let matrix = SimilarityMatrix::new(&dag, options.clone()).unwrap();
    let row_ids: Vec<_> = matrix
        .row_nodes()
        .into_iter()
        .map(|n| dag.term(n).id.clone())
        .collect();
    assert_eq!(row_ids, vec!["c", "d"]);

    let (stats, rows) = run(&dag, options);
    assert_eq!(stats.pairs, 7);
    assert_eq!(stats.rows, 4);
    assert_eq!(stats.zero, 3);
    assert!(rows.iter().all(|r| r[0] == "c" || r[0] == "d"));
}

#[test]
fn test_precision() {
    let dag = fixture();
    let (_, rows) = run(
        &dag,
        MatrixOptions {
            node: Some("c".to_string()),
            precision: Some(3),
            ..MatrixOptions::default()
        },
    );

    let row = rows.iter().find(|r| r[2] == "d").unwrap();
    assert_eq!(row[1], "term c");
    assert_eq!(row[5], "term a");
    assert_eq!(row[6], "0.243");
}

#[test]
fn test_progress_reports_each_row() {
    let dag = fixture();
    let matrix = SimilarityMatrix::new(&dag, MatrixOptions::default()).unwrap();

    let mut seen = Vec::new();
    matrix
        .write_tsv_with_progress(std::io::sink(), |done| seen.push(done))
        .unwrap();
    assert_eq!(seen, (1..=8).collect::<Vec<_>>());
}

#[test]
fn test_unknown_row_node() {
    let dag = fixture();
    let result = SimilarityMatrix::new(
        &dag,
        MatrixOptions {
            node: Some("missing".to_string()),
            ..MatrixOptions::default()
        },
    );
    assert!(matches!(result, Err(SimilarityError::Graph(_))));
}

#[test]
fn test_requires_information_content() {
    let mut dag = fixture();
    dag.clear_information_content();
    assert!(matches!(
        SimilarityMatrix::new(&dag, MatrixOptions::default()),
        Err(SimilarityError::Mica(_))
    ));
}

#[test]
fn test_failed_pairs_are_counted_and_skipped() {
    // z -> zz is a second component, unreachable from the root r
    let mut dag = Dag::new();
    for id in ["r", "a", "b", "z", "zz"] {
        dag.add_term(Term::new(id, id)).unwrap();
    }
    dag.add_edge("r", "a").unwrap();
    dag.add_edge("r", "b").unwrap();
    dag.add_edge("z", "zz").unwrap();
    compute_information_content(&mut dag).unwrap();

    let (stats, rows) = run(&dag, MatrixOptions::default());
    assert_eq!(
        stats,
        MatrixStats {
            pairs: 10,
            rows: 0,
            zero: 3,
            errors: 7,
        }
    );
    assert!(rows.is_empty());
}

#[test]
fn test_names_with_tabs_keep_columns() {
    let mut dag = Dag::new();
    dag.add_term(Term::new("r", "root")).unwrap();
    dag.add_term(Term::new("p", "parent\tterm")).unwrap();
    dag.add_term(Term::new("x", "first\nchild")).unwrap();
    dag.add_term(Term::new("y", "second child")).unwrap();
    dag.add_term(Term::new("q", "sibling")).unwrap();
    dag.add_edge("r", "p").unwrap();
    dag.add_edge("r", "q").unwrap();
    dag.add_edge("p", "x").unwrap();
    dag.add_edge("p", "y").unwrap();
    compute_information_content(&mut dag).unwrap();

    let (stats, rows) = run(&dag, MatrixOptions::default());
    assert_eq!(stats.rows, 3);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.len() == 7));

    let row = rows.iter().find(|r| r[0] == "x" && r[2] == "y").unwrap();
    assert_eq!(row[1], "first child");
    assert_eq!(row[5], "parent term");
}

#[test]
fn test_tsv_field() {
    assert_eq!(tsv_field("plain name"), "plain name");
    assert_eq!(tsv_field("a\tb\r\nc"), "a b  c");
}
