use dagic_core::{
    compute_information_content, Dag, Format, GraphFile, GraphFormat, GraphMlFormat, JsonFormat,
    StorageError, Term,
};
use tempfile::TempDir;

fn create_scored_graph() -> Dag {
    let mut dag = Dag::new();
    for (id, name) in [
        ("DOID:4", "disease"),
        ("DOID:7", "disease of anatomical entity"),
        ("DOID:14566", "disease of cellular proliferation"),
        ("DOID:162", "cancer"),
        ("DOID:1612", "breast cancer"),
    ] {
        dag.add_term(Term::new(id, name)).unwrap();
    }
    for (p, c) in [
        ("DOID:4", "DOID:7"),
        ("DOID:4", "DOID:14566"),
        ("DOID:14566", "DOID:162"),
        ("DOID:162", "DOID:1612"),
        ("DOID:7", "DOID:1612"),
    ] {
        dag.add_edge(p, c).unwrap();
    }
    compute_information_content(&mut dag).unwrap();
    dag
}

fn assert_same_graph(expected: &Dag, actual: &Dag) {
    assert_eq!(actual.len(), expected.len());
    assert_eq!(actual.edge_count(), expected.edge_count());

    for (_, term) in expected.iter() {
        let loaded = actual.get(&term.id).unwrap();
        assert_eq!(loaded.name, term.name);
        assert_eq!(loaded.ndes, term.ndes, "ndes of {}", term.id);
        assert_eq!(loaded.ic, term.ic, "ic of {}", term.id);
    }

    let mut want: Vec<_> = expected
        .edges()
        .map(|(p, c)| (expected.term(p).id.clone(), expected.term(c).id.clone()))
        .collect();
    let mut got: Vec<_> = actual
        .edges()
        .map(|(p, c)| (actual.term(p).id.clone(), actual.term(c).id.clone()))
        .collect();
    want.sort();
    got.sort();
    assert_eq!(got, want);
}

#[test]
fn test_json_file_round_trip() {
    let temp = TempDir::new().unwrap();
    let dag = create_scored_graph();

    let file = GraphFile::new(temp.path().join("doid.json"));
    file.save(&dag).unwrap();
    let loaded = file.load().unwrap();

    assert_same_graph(&dag, &loaded);
    assert!(loaded.has_information_content());
}

#[test]
fn test_graphml_file_round_trip() {
    let temp = TempDir::new().unwrap();
    let dag = create_scored_graph();

    let file = GraphFile::new(temp.path().join("doid.graphml"));
    file.save(&dag).unwrap();
    let loaded = file.load().unwrap();

    assert_same_graph(&dag, &loaded);
}

#[test]
fn test_json_to_graphml_conversion() {
    let dag = create_scored_graph();

    let json = JsonFormat.render(&dag).unwrap();
    let from_json = JsonFormat.parse(&json).unwrap();
    let xml = GraphMlFormat.render(&from_json).unwrap();
    let from_xml = GraphMlFormat.parse(&xml).unwrap();

    assert!(xml.starts_with("<?xml"));
    assert_same_graph(&dag, &from_xml);
}

#[test]
fn test_unscored_graph_omits_ic() {
    let mut dag = create_scored_graph();
    dag.clear_information_content();

    let json = JsonFormat.render(&dag).unwrap();
    assert!(!json.contains("\"ic\""));
    assert!(!json.contains("\"ndes\""));

    let loaded = JsonFormat.parse(&json).unwrap();
    assert!(!loaded.has_information_content());
}

#[test]
fn test_save_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("out").join("graph.xml");

    GraphFile::new(&path).save(&create_scored_graph()).unwrap();
    assert!(path.exists());
}

#[test]
fn test_format_inference() {
    assert_eq!(Format::from_path("a/b/doid.json"), Some(Format::Json));
    assert_eq!(Format::from_path("doid.GraphML"), Some(Format::GraphMl));
    assert_eq!(Format::from_path("doid.xml"), Some(Format::GraphMl));
    assert_eq!(Format::from_path("doid.obo"), None);
    assert_eq!(Format::from_path("doid"), None);

    assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
    assert_eq!("GRAPHML".parse::<Format>().unwrap(), Format::GraphMl);
    assert!(matches!(
        "obo".parse::<Format>(),
        Err(StorageError::UnknownFormat(_))
    ));
    assert_eq!(Format::GraphMl.to_string(), "graphml");
    assert_eq!(Format::Json.handler().name(), "json");
    assert_eq!(Format::GraphMl.handler().name(), "graphml");
}

#[test]
fn test_unknown_extension_requires_explicit_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doid.dat");
    let dag = create_scored_graph();

    assert!(matches!(
        GraphFile::new(&path).save(&dag),
        Err(StorageError::UnknownFormat(_))
    ));

    let file = GraphFile::with_format(&path, Format::Json);
    file.save(&dag).unwrap();
    assert_same_graph(&dag, &file.load().unwrap());
}

#[test]
fn test_load_missing_file() {
    let temp = TempDir::new().unwrap();
    let result = GraphFile::new(temp.path().join("missing.json")).load();
    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        JsonFormat.parse("{ not json"),
        Err(StorageError::Json(_))
    ));
}
