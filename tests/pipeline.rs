use std::path::PathBuf;

use bsu_index::annotation::{Annotation, Qualifier, Subject};
use bsu_index::clusters::GenotypeClusters;
use bsu_index::document::{AnnotationRow, IterSource, JsonLinesSink};
use bsu_index::markers::Marker;
use bsu_index::parser::obo::OboSource;
use bsu_index::registry::Grouping;
use bsu_index::relationships::RelatedTerms;
use bsu_index::{
    DocumentBuilder, GenotypeClusterKey, GenotypeKey, HomologyClusterKey, IndexConfig, IndexError,
    MarkerKey, OntologyCache, Organism, OrthologyCache, RegistryBuilder, RelationshipIndex,
    TermKey,
};

fn init_logging() {
    simple_logger::SimpleLogger::new().env().init().ok();
}

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/small.obo")
}

struct Keys {
    retardation: TermKey,
    body_size: TermKey,
    cancer: TermKey,
}

fn load_ontology() -> (OntologyCache, Keys) {
    let source = OboSource::from_file(fixture()).unwrap();
    let key = |id: &str| source.key_of(id).unwrap();
    let keys = Keys {
        retardation: key("MP:0001732"),
        body_size: key("MP:0001265"),
        cancer: key("DOID:162"),
    };
    (OntologyCache::load(&source).unwrap(), keys)
}

fn orthology() -> OrthologyCache {
    let mut cache = OrthologyCache::default();
    cache.add_marker(Marker::new(1u32.into(), "Kit", "MGI:96677", Organism::Mouse));
    cache.add_marker(Marker::new(2u32.into(), "KIT", "3815", Organism::Human));
    cache.add_ortholog(1u32.into(), 2u32.into());
    cache.add_to_homology_cluster(1u32.into(), 1u32.into());
    cache.add_to_homology_cluster(2u32.into(), 1u32.into());
    cache
}

#[test]
fn load_fixture() {
    init_logging();
    let ontology = OntologyCache::from_obo(fixture()).unwrap();
    // the obsolete term is not loaded
    assert_eq!(ontology.len(), 7);
    assert_eq!(ontology.cycles_detected(), 0);

    let (ontology, keys) = load_ontology();
    let ancestors: Vec<&str> = ontology
        .term(keys.retardation)
        .unwrap()
        .ancestors()
        .map(|term| term.label())
        .collect();
    assert_eq!(ancestors.len(), 3);
    assert!(ancestors.contains(&"decreased body size"));
    assert_eq!(ontology.synonyms(keys.cancer), ["malignant neoplasm"]);
}

#[test]
fn missing_file() {
    assert!(matches!(
        OntologyCache::from_obo("/nonexistent/mp.obo"),
        Err(IndexError::CannotOpenFile(_))
    ));
}

#[test]
fn full_pass_to_json_lines() {
    init_logging();
    let (ontology, keys) = load_ontology();
    let orthology = orthology();

    let human_marker = MarkerKey::from(2u32);
    let gc = GenotypeClusterKey::from(10u32);
    let orphan_gc = GenotypeClusterKey::from(11u32);
    let hc = HomologyClusterKey::from(1u32);

    let registry = RegistryBuilder::new().warm_up(
        vec![(human_marker, keys.cancer)],
        vec![(gc, Some(hc)), (orphan_gc, None)],
    );
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.stats().mouse_without_homology, 1);

    let clusters: GenotypeClusters = [(GenotypeKey::from(100u32), gc)].into_iter().collect();
    let annotations = vec![
        Annotation::new(3u32.into(), Subject::Genotype(100u32.into()), keys.retardation),
        Annotation::new(4u32.into(), Subject::Genotype(100u32.into()), keys.body_size)
            .with_qualifier(Qualifier::Not),
        Annotation::new(5u32.into(), Subject::Genotype(100u32.into()), keys.cancer),
    ];
    let relationships = RelationshipIndex::build(&annotations, &clusters);

    let human = Grouping::Human {
        marker: human_marker,
        disease: keys.cancer,
    };
    let mouse = Grouping::Mouse {
        genotype_cluster: gc,
        homology_cluster: Some(hc),
    };
    let orphan = Grouping::Mouse {
        genotype_cluster: orphan_gc,
        homology_cluster: None,
    };
    let rows = vec![
        AnnotationRow::new(1u32.into(), human, keys.cancer).with_reference("PMID:1"),
        AnnotationRow::new(2u32.into(), human, keys.cancer).with_reference("PMID:2"),
        AnnotationRow::new(3u32.into(), mouse, keys.retardation).with_reference("J:1"),
        AnnotationRow::new(4u32.into(), mouse, keys.body_size).with_qualifier(Qualifier::Not),
        AnnotationRow::new(5u32.into(), mouse, keys.cancer),
        AnnotationRow::new(6u32.into(), orphan, keys.cancer),
    ];

    let config = IndexConfig {
        batch_size: 1,
        check_order: true,
        ..Default::default()
    };
    let want = RelatedTerms {
        terms: true,
        phenotypes: true,
        ..Default::default()
    };
    let sink = JsonLinesSink::new(Vec::new());
    let mut builder = DocumentBuilder::new(&ontology, &registry, sink, &config)
        .with_orthology(&orthology)
        .with_relationships(&relationships, want);
    builder.consume(IterSource::new(rows)).unwrap();
    let (sink, stats) = builder.finish().unwrap();

    assert_eq!(stats.rows_seen, 6);
    assert_eq!(stats.rows_dropped, 1);
    assert_eq!(stats.records_emitted, 2);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let docs: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(docs.len(), 2);

    let human_doc = &docs[0];
    assert_eq!(human_doc["bsu"], 1);
    assert_eq!(human_doc["organism"], "human");
    assert_eq!(human_doc["marker_symbol"], "KIT");
    assert_eq!(human_doc["annotated"]["terms"], serde_json::json!(["cancer"]));
    assert_eq!(
        human_doc["annotated"]["ids"],
        serde_json::json!(["DOID:162", "DOID:8530"])
    );
    assert_eq!(
        human_doc["annotated"]["ancestor_terms"],
        serde_json::json!(["disease", "disease of cellular proliferation"])
    );
    assert_eq!(human_doc["references"], serde_json::json!(["PMID:1", "PMID:2"]));
    assert_eq!(human_doc["ortholog_symbols"], serde_json::json!(["Kit"]));

    let mouse_doc = &docs[1];
    assert_eq!(mouse_doc["bsu"], 2);
    assert_eq!(mouse_doc["organism"], "mouse");
    assert_eq!(mouse_doc["genotype_cluster"], 10);
    assert_eq!(mouse_doc["homology_cluster"], 1);
    assert_eq!(mouse_doc["marker_symbol"], "Kit");
    assert_eq!(
        mouse_doc["annotated"]["terms"],
        serde_json::json!(["cancer", "postnatal growth retardation"])
    );
    assert_eq!(
        mouse_doc["excluded"]["terms"],
        serde_json::json!(["decreased body size"])
    );
    assert!(mouse_doc["excluded"]["ancestor_terms"]
        .as_array()
        .unwrap()
        .is_empty());
    let ancestor_ids = mouse_doc["annotated"]["ancestor_ids"].as_array().unwrap();
    assert!(ancestor_ids.contains(&serde_json::json!("MP:0003936")));
    assert_eq!(mouse_doc["qualifiers"], serde_json::json!(["NOT"]));
    // the cancer annotation pulls in the phenotypes of the same genotype cluster
    let related = mouse_doc["related"].as_array().unwrap();
    assert!(related.contains(&serde_json::json!("postnatal growth retardation")));
    assert!(related.contains(&serde_json::json!("mammalian phenotype")));
    assert!(!related.contains(&serde_json::json!("cancer")));
    assert_eq!(mouse_doc["ortholog_symbols"], serde_json::json!(["KIT"]));
}

#[test]
fn unsorted_stream_is_rejected() {
    init_logging();
    let (ontology, keys) = load_ontology();
    let registry = RegistryBuilder::new().warm_up(
        vec![
            (MarkerKey::from(1u32), keys.cancer),
            (MarkerKey::from(2u32), keys.cancer),
        ],
        Vec::new(),
    );
    let grouping = |marker: u32| Grouping::Human {
        marker: marker.into(),
        disease: keys.cancer,
    };
    let rows = vec![
        AnnotationRow::new(1u32.into(), grouping(1), keys.cancer),
        AnnotationRow::new(2u32.into(), grouping(2), keys.cancer),
        AnnotationRow::new(3u32.into(), grouping(1), keys.cancer),
    ];
    let config = IndexConfig {
        check_order: true,
        ..Default::default()
    };
    let mut builder = DocumentBuilder::new(
        &ontology,
        &registry,
        JsonLinesSink::new(Vec::new()),
        &config,
    );
    let res = builder.consume(IterSource::new(rows));
    assert!(matches!(res, Err(IndexError::UnsortedInput { .. })));
}
