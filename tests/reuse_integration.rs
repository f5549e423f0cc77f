//! Integration tests for reuse matching and index-chain reuse.
//!
//! These tests drive the public API end to end: building the Corpus Index,
//! classifying units, linking new versions, reusing chain prefixes, and the
//! file-level runners.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use nanopub_reuse::io::reader::read_nanopubs;
use nanopub_reuse::io::records::read_identities;
use nanopub_reuse::io::writer::write_nanopub;
use nanopub_reuse::io::open_input;
use nanopub_reuse::vocab::{
    DCT_CREATED, NPX_SUPERSEDES, NP_HAS_ASSERTION, NP_HAS_PROVENANCE, NP_HAS_PUBINFO, NP_NANOPUBLICATION,
    RDF_TYPE, TEMP_NANOPUB_PREFIX,
};
use nanopub_reuse::{
    is_trusty, make_trusty, reuse_chain, CorpusIndexBuilder, CorpusInput, FingerprintOptions,
    FingerprintSettings, FingerprinterRegistry, IndexCreator, IndexLoadError, IndexMetadata, IndexNanopub,
    IndexReuseConfig, IndexSource, Inventory, MatchStats, Nanopub, OutputTarget, PriorSource, RdfSyntax,
    RecordInput, ReuseAction, ReuseConfig, ReuseMatcher, ReuseRecord, RunError, Statement, Term, TopicField,
    TopicSettings, TopicSlot,
};
use nanopub_reuse::{run_index_reuse, run_reuse, TopicExtractorRegistry, TopicOptions};
use proptest::prelude::*;
use tempfile::TempDir;

const BASE: &str = "http://purl.org/np/";

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Trusty unit about `subject` carrying one assertion statement per value.
fn make_unit(subject: &str, values: &[&str], created: &str) -> Nanopub {
    let uri = format!("{}draft", TEMP_NANOPUB_PREFIX);
    let g = |name: &str| format!("{}#{}", uri, name);
    let mut statements = vec![
        Statement::new(Term::iri(&uri), RDF_TYPE, Term::iri(NP_NANOPUBLICATION), g("Head")),
        Statement::new(Term::iri(&uri), NP_HAS_ASSERTION, Term::iri(g("assertion")), g("Head")),
        Statement::new(Term::iri(&uri), NP_HAS_PROVENANCE, Term::iri(g("provenance")), g("Head")),
        Statement::new(Term::iri(&uri), NP_HAS_PUBINFO, Term::iri(g("pubinfo")), g("Head")),
        Statement::new(
            Term::iri(g("assertion")),
            "http://www.w3.org/ns/prov#wasDerivedFrom",
            Term::iri("http://example.org/release"),
            g("provenance"),
        ),
        Statement::new(Term::iri(&uri), DCT_CREATED, Term::string(created), g("pubinfo")),
    ];
    for (i, value) in values.iter().enumerate() {
        statements.push(Statement::new(
            Term::iri(subject),
            format!("http://example.org/p{}", i),
            Term::string(*value),
            g("assertion"),
        ));
    }
    make_trusty(&Nanopub::from_statements(statements).unwrap(), BASE).unwrap()
}

fn make_matcher(records: &[ReuseRecord]) -> ReuseMatcher {
    let fingerprinter = FingerprinterRegistry::with_defaults()
        .build("default", &FingerprintOptions::default())
        .unwrap();
    let topics = TopicExtractorRegistry::with_defaults()
        .build("default", &TopicOptions::default())
        .unwrap();
    let index = {
        let mut builder =
            CorpusIndexBuilder::begin(IndexSource::Records, fingerprinter.as_ref(), Some(topics.as_ref()), None)
                .unwrap();
        for record in records {
            builder.add_record(record);
        }
        builder.finish()
    };
    ReuseMatcher::new(index, fingerprinter, Some(topics))
}

fn record_of(np: &Nanopub, topic: &str) -> ReuseRecord {
    let fp = FingerprinterRegistry::with_defaults()
        .build("default", &FingerprintOptions::default())
        .unwrap()
        .fingerprint(np)
        .unwrap();
    ReuseRecord::new(np.uri(), fp).with_topic(TopicField::Defined(topic.to_string()))
}

fn fixed_metadata(page_size: usize) -> IndexMetadata {
    IndexMetadata {
        title: Some("Test index".to_string()),
        creators: vec!["https://orcid.org/0000-0000-0000-0000".to_string()],
        page_size,
        timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        ..IndexMetadata::default()
    }
}

/// Publish `elements` as a chain, in chain order.
fn make_chain(elements: &[String], page_size: usize) -> Vec<Nanopub> {
    let mut creator = IndexCreator::new(fixed_metadata(page_size), None);
    let mut pages = Vec::new();
    for element in elements {
        pages.extend(creator.add_element(element).unwrap());
    }
    pages.extend(creator.finish().unwrap());
    pages
}

fn elements_of(pages: &[Nanopub]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| IndexNanopub::from_nanopub(page.clone()).unwrap().elements().to_vec())
        .collect()
}

fn element(name: &str) -> String {
    format!("http://example.org/np/{}", name)
}

fn write_corpus(path: &Path, units: &[&Nanopub]) {
    let mut buf = Vec::new();
    for np in units {
        write_nanopub(&mut buf, np, RdfSyntax::TriG).unwrap();
    }
    fs::write(path, buf).unwrap();
}

fn read_corpus(path: &Path) -> Vec<Nanopub> {
    read_nanopubs(open_input(path, false).unwrap(), RdfSyntax::TriG).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Matching
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_shared_topic_is_ambiguous() {
    let topic = "http://example.org/gene/BRCA1";
    let mut matcher = make_matcher(&[
        ReuseRecord::new("http://example.org/u1", "fpA").with_topic(TopicField::Defined(topic.into())),
        ReuseRecord::new("http://example.org/u2", "fpB").with_topic(TopicField::Defined(topic.into())),
    ]);
    assert_eq!(matcher.index().topic_slot(topic), TopicSlot::Multiple);
    assert_eq!(matcher.index().stats().out_of_corpus_duplicate_topics, 1);

    let mut stats = MatchStats::default();
    let outcome = matcher
        .process(make_unit(topic, &["breast cancer"], "2024"), &mut stats)
        .unwrap();

    assert_eq!(outcome.action, ReuseAction::New);
    assert_eq!(stats.new_count, 1);
    assert_eq!(stats.matching_errors(), 1);
}

#[test]
fn test_changed_unit_supersedes_its_predecessor() {
    let topic = "http://example.org/gene/TP53";
    let prior = make_unit(topic, &["tumor suppressor"], "2020");
    let mut matcher = make_matcher(&[record_of(&prior, topic)]);

    let changed = make_unit(topic, &["tumor suppressor", "apoptosis"], "2024");
    let mut stats = MatchStats::default();
    let outcome = matcher.process(changed.clone(), &mut stats).unwrap();

    assert_eq!(
        outcome.action,
        ReuseAction::Superseded {
            previous: prior.uri().to_string()
        }
    );
    assert_ne!(outcome.identity, changed.uri(), "linking must re-identify the unit");
    assert!(is_trusty(&outcome.nanopub));
    assert!(outcome
        .nanopub
        .pubinfo()
        .iter()
        .any(|st| st.predicate == NPX_SUPERSEDES && st.object.is_iri(prior.uri())));
    assert_eq!(matcher.index().topic_slot(topic), TopicSlot::Matched);

    // A second unit on the same topic is a duplicate.
    let again = make_unit(topic, &["tumor suppressor", "DNA repair"], "2024");
    let outcome = matcher.process(again, &mut stats).unwrap();
    assert_eq!(outcome.action, ReuseAction::New);
    assert_eq!(stats.in_corpus_duplicate_topics, 1);
}

#[test]
fn test_linked_records_reuse_on_rerun() {
    let topic = "http://example.org/gene/TP53";
    let prior = make_unit(topic, &["tumor suppressor"], "2020");
    let mut first = make_matcher(&[record_of(&prior, topic)]);

    let changed = make_unit(topic, &["tumor suppressor", "apoptosis"], "2024");
    let outcome = first.process(changed, &mut MatchStats::default()).unwrap();
    let record = outcome.record();

    // The record keeps the pre-link fingerprint, so the same content reuses the linked identity.
    let mut second = make_matcher(&[record]);
    let mut stats = MatchStats::default();
    let rerun = second.process(make_unit(topic, &["tumor suppressor", "apoptosis"], "2025"), &mut stats).unwrap();
    assert_eq!(rerun.action, ReuseAction::Reused);
    assert_eq!(rerun.identity, outcome.identity);
    assert_eq!(stats.matching_errors(), 0);
}

#[test]
fn test_classification_is_repeatable() {
    let topic = "http://example.org/gene/EGFR";
    let prior = make_unit(topic, &["kinase"], "2020");
    let records = vec![record_of(&prior, topic)];
    let corpus = vec![
        make_unit(topic, &["kinase"], "2024"),
        make_unit("http://example.org/gene/KRAS", &["GTPase"], "2024"),
    ];

    let classify = || {
        let mut matcher = make_matcher(&records);
        let mut stats = MatchStats::default();
        let actions: Vec<_> = corpus
            .iter()
            .map(|np| matcher.process(np.clone(), &mut stats).unwrap().action)
            .collect();
        (actions, stats)
    };
    let (a, stats_a) = classify();
    let (b, stats_b) = classify();
    assert_eq!(a, b);
    assert_eq!(stats_a, stats_b);
    assert_eq!(a, vec![ReuseAction::Reused, ReuseAction::New]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Index chains
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_chain_prefix_reuse() {
    let all: Vec<String> = ["a", "b", "c", "d"].iter().map(|n| element(n)).collect();
    let chain = make_chain(&all, 2);
    assert_eq!(chain.len(), 2);

    let inventory = Inventory::from_identities(all[..3].to_vec());
    let result = reuse_chain(inventory, chain.clone(), &fixed_metadata(2)).unwrap();

    assert_eq!(result.reuse_count, 1);
    assert_eq!(result.reusable_chain, vec![chain[0].clone()]);
    assert_eq!(result.new_chain_tail.len(), 1);

    let tail = IndexNanopub::from_nanopub(result.new_chain_tail[0].clone()).unwrap();
    assert_eq!(tail.elements(), &[element("c")]);
    assert_eq!(tail.appended_index(), Some(chain[0].uri()));
    assert!(!tail.is_incomplete());
}

#[test]
fn test_full_inventory_reuses_whole_chain() {
    let all: Vec<String> = (0..5).map(|i| element(&i.to_string())).collect();
    let chain = make_chain(&all, 2);
    let result = reuse_chain(Inventory::from_identities(all.clone()), chain.clone(), &fixed_metadata(2)).unwrap();

    assert_eq!(result.reuse_count, chain.len());
    // Nothing left and a predecessor exists: one empty complete page closes the chain.
    assert_eq!(result.new_chain_tail.len(), 1);
    assert!(elements_of(&result.new_chain_tail).is_empty());
}

#[test]
fn test_empty_closing_page_counts_on_next_republication() {
    let all: Vec<String> = (0..5).map(|i| element(&i.to_string())).collect();
    let first = reuse_chain(Inventory::from_identities(all.clone()), make_chain(&all, 2), &fixed_metadata(2)).unwrap();
    let mut republished = first.reusable_chain;
    republished.extend(first.new_chain_tail);
    assert_eq!(republished.len(), 4);

    // The empty closing page is satisfied like any other: k satisfied pages, count k.
    let second = reuse_chain(Inventory::from_identities(all), republished.clone(), &fixed_metadata(2)).unwrap();
    assert_eq!(second.reuse_count, 4);
    assert_eq!(second.reusable_chain, republished);

    // An empty first page is counted even when the walk diverges right after it.
    let mut creator = IndexCreator::new(fixed_metadata(2), None);
    creator.add_element(&element("a")).unwrap();
    let seed = creator.finish().unwrap().unwrap();
    let mut empty_then = IndexCreator::new(fixed_metadata(2), Some(seed.uri().to_string()));
    let closing = empty_then.finish().unwrap().unwrap();
    let result = reuse_chain(
        Inventory::from_identities(vec![element("a"), element("b")]),
        vec![seed, closing],
        &fixed_metadata(2),
    )
    .unwrap();
    assert_eq!(result.reuse_count, 2);
    assert_eq!(elements_of(&result.new_chain_tail), vec![element("b")]);
}

proptest! {
    #[test]
    fn prop_reused_prefix_plus_tail_covers_inventory(
        n in 1usize..12,
        page_size in 1usize..4,
        kept in 0usize..12,
        extra in 0usize..4,
    ) {
        let kept = kept.min(n);
        let all: Vec<String> = (0..n).map(|i| element(&i.to_string())).collect();
        let chain = make_chain(&all, page_size);

        let mut inventory: Vec<String> = all[..kept].to_vec();
        inventory.extend((0..extra).map(|i| element(&format!("extra{}", i))));
        let result = reuse_chain(
            Inventory::from_identities(inventory.clone()),
            chain.clone(),
            &fixed_metadata(page_size),
        ).unwrap();

        let pages = chain.len();
        let expected = (0..pages).take_while(|j| ((j + 1) * page_size).min(n) <= kept).count();
        prop_assert_eq!(result.reuse_count, expected);
        prop_assert_eq!(&result.reusable_chain[..], &chain[..expected]);

        let mut covered = elements_of(&result.reusable_chain);
        covered.extend(elements_of(&result.new_chain_tail));
        covered.sort();
        let mut wanted = inventory;
        wanted.sort();
        prop_assert_eq!(covered, wanted);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File runs
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_run_reuse_end_to_end() {
    let dir = TempDir::new().unwrap();
    let gene = |n: &str| format!("http://example.org/gene/{}", n);

    let a = make_unit(&gene("A"), &["one"], "2020");
    let b = make_unit(&gene("B"), &["two"], "2020");
    write_corpus(&dir.path().join("prior.trig"), &[&a, &b]);

    let a_again = make_unit(&gene("A"), &["one"], "2024");
    let b_changed = make_unit(&gene("B"), &["two", "three"], "2024");
    let c = make_unit(&gene("C"), &["four"], "2024");
    write_corpus(&dir.path().join("new.trig"), &[&a_again, &b_changed, &c]);

    let config = ReuseConfig {
        inputs: vec![CorpusInput::resolve(dir.path().join("new.trig"), None).unwrap()],
        prior: PriorSource::resolve(dir.path().join("prior.trig"), None).unwrap(),
        output: OutputTarget::resolve(Some(dir.path().join("out.trig")), None).unwrap(),
        output_new: true,
        all_output: Some(OutputTarget::resolve(Some(dir.path().join("all.trig")), None).unwrap()),
        records: Some(dir.path().join("records.txt")),
        table: Some(dir.path().join("table.csv")),
        fingerprint: FingerprintSettings::default(),
        lineage: Some(TopicSettings::default()),
    };
    let summaries = run_reuse(&config).unwrap();

    assert_eq!(summaries.len(), 1);
    let matched = summaries[0].matched;
    assert_eq!(
        (matched.input_count, matched.reuse_count, matched.superseded_count, matched.new_count),
        (3, 1, 1, 1)
    );
    let table = fs::read_to_string(dir.path().join("table.csv")).unwrap();
    assert_eq!(table, "new.trig,2,2,3,1,1,0,0,0\n");

    let identities = read_identities(open_input(&dir.path().join("records.txt"), false).unwrap()).unwrap();
    assert_eq!(identities.len(), 3);
    assert_eq!(identities[0], a.uri(), "reused unit keeps its prior identity");
    assert_eq!(identities[2], c.uri());

    let written = read_corpus(&dir.path().join("out.trig"));
    assert_eq!(written.len(), 2, "only new and superseding units go to the content output");
    assert!(written[0]
        .pubinfo()
        .iter()
        .any(|st| st.predicate == NPX_SUPERSEDES && st.object.is_iri(b.uri())));

    let all = read_corpus(&dir.path().join("all.trig"));
    assert_eq!(all.len(), 3);
    assert_eq!(all[0], a, "reused unit is replayed verbatim from the prior corpus");

    // Rerun from the records just written: everything is reused.
    let rerun = ReuseConfig {
        prior: PriorSource::resolve(dir.path().join("records.txt"), None).unwrap(),
        output_new: false,
        all_output: None,
        records: None,
        table: None,
        ..config
    };
    let summaries = run_reuse(&rerun).unwrap();
    assert_eq!(summaries[0].matched.reuse_count, 3);
    assert_eq!(summaries[0].matched.matching_errors(), 0);
}

#[test]
fn test_run_reuse_writes_every_unit_without_new_flag() {
    let dir = TempDir::new().unwrap();
    let gene = |n: &str| format!("http://example.org/gene/{}", n);

    let a = make_unit(&gene("A"), &["one"], "2020");
    let b = make_unit(&gene("B"), &["two"], "2020");
    write_corpus(&dir.path().join("prior.trig"), &[&a, &b]);

    let a_again = make_unit(&gene("A"), &["one"], "2024");
    let b_changed = make_unit(&gene("B"), &["two", "three"], "2024");
    let c = make_unit(&gene("C"), &["four"], "2024");
    write_corpus(&dir.path().join("new.trig"), &[&a_again, &b_changed, &c]);

    let config = ReuseConfig {
        inputs: vec![CorpusInput::resolve(dir.path().join("new.trig"), None).unwrap()],
        prior: PriorSource::resolve(dir.path().join("prior.trig"), None).unwrap(),
        output: OutputTarget::resolve(Some(dir.path().join("out.trig")), None).unwrap(),
        output_new: false,
        all_output: None,
        records: None,
        table: None,
        fingerprint: FingerprintSettings::default(),
        lineage: Some(TopicSettings::default()),
    };
    run_reuse(&config).unwrap();

    let written = read_corpus(&dir.path().join("out.trig"));
    assert_eq!(written.len(), 3, "every unit goes to the content output");
    assert_eq!(written[0], a_again, "reused unit is written as read");
    assert_ne!(written[1].uri(), b_changed.uri(), "superseding unit is written relinked");
    assert!(written[1]
        .pubinfo()
        .iter()
        .any(|st| st.predicate == NPX_SUPERSEDES && st.object.is_iri(b.uri())));
    assert_eq!(written[2], c);
}

#[test]
fn test_run_reuse_multiple_files() {
    let dir = TempDir::new().unwrap();
    let gene = |n: &str| format!("http://example.org/gene/{}", n);

    let a = make_unit(&gene("A"), &["one"], "2020");
    write_corpus(&dir.path().join("prior.trig"), &[&a]);
    write_corpus(
        &dir.path().join("f1.trig"),
        &[&make_unit(&gene("A"), &["one", "two"], "2024"), &make_unit(&gene("C"), &["four"], "2024")],
    );
    // Repeats the topic the first file already superseded.
    write_corpus(&dir.path().join("f2.trig"), &[&make_unit(&gene("A"), &["one", "three"], "2024")]);

    let config = ReuseConfig {
        inputs: vec![
            CorpusInput::resolve(dir.path().join("f1.trig"), None).unwrap(),
            CorpusInput::resolve(dir.path().join("f2.trig"), None).unwrap(),
        ],
        prior: PriorSource::resolve(dir.path().join("prior.trig"), None).unwrap(),
        output: OutputTarget::resolve(Some(dir.path().join("out.trig")), None).unwrap(),
        output_new: true,
        all_output: None,
        records: Some(dir.path().join("records.txt")),
        table: Some(dir.path().join("table.csv")),
        fingerprint: FingerprintSettings::default(),
        lineage: Some(TopicSettings::default()),
    };
    let summaries = run_reuse(&config).unwrap();
    assert_eq!(summaries.len(), 2);

    let table = fs::read_to_string(dir.path().join("table.csv")).unwrap();
    assert_eq!(table, "f1.trig,1,1,2,0,1,0,0,0\nf2.trig,1,1,3,0,1,1,0,1\n");

    let identities = read_identities(open_input(&dir.path().join("records.txt"), false).unwrap()).unwrap();
    assert_eq!(identities.len(), 3, "later files append to the records");
    assert_eq!(read_corpus(&dir.path().join("out.trig")).len(), 3, "later files append to the content output");
}

#[test]
fn test_replay_needs_full_prior_corpus() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("prior.txt"), "http://example.org/u1 fpA\n").unwrap();
    write_corpus(&dir.path().join("new.trig"), &[&make_unit("http://example.org/x", &["v"], "2024")]);

    let config = ReuseConfig {
        inputs: vec![CorpusInput::resolve(dir.path().join("new.trig"), None).unwrap()],
        prior: PriorSource::resolve(dir.path().join("prior.txt"), None).unwrap(),
        output: OutputTarget::stdout(),
        output_new: false,
        all_output: Some(OutputTarget::resolve(Some(dir.path().join("all.trig")), None).unwrap()),
        records: None,
        table: None,
        fingerprint: FingerprintSettings::default(),
        lineage: None,
    };
    let err = run_reuse(&config).unwrap_err();
    let RunError::InFile { source, .. } = err else {
        panic!("expected a file-tagged error, got {err:?}");
    };
    assert!(matches!(*source, RunError::IndexLoad(IndexLoadError::IncompatibleSource)));
}

#[test]
fn test_run_index_reuse_end_to_end() {
    let dir = TempDir::new().unwrap();
    let records = |names: &[&str]| -> String {
        names.iter().map(|n| format!("{} fp{}\n", element(n), n)).collect()
    };
    fs::write(dir.path().join("first.txt"), records(&["a", "b", "c", "d"])).unwrap();
    fs::write(dir.path().join("second.txt"), records(&["a", "b", "c"])).unwrap();

    let first = IndexReuseConfig {
        inventories: vec![RecordInput::new(dir.path().join("first.txt"))],
        prior_chain: None,
        output: OutputTarget::resolve(Some(dir.path().join("chain.trig")), None).unwrap(),
        all_output: None,
        table: None,
        index: fixed_metadata(2),
    };
    let summaries = run_index_reuse(&first).unwrap();
    assert_eq!(summaries[0].reuse_count, 0);
    assert_eq!(summaries[0].new_pages, 2);
    let chain = read_corpus(&dir.path().join("chain.trig"));
    assert_eq!(summaries[0].index_uri.as_deref(), Some(chain[1].uri()));

    let second = IndexReuseConfig {
        inventories: vec![RecordInput::new(dir.path().join("second.txt"))],
        prior_chain: Some(CorpusInput::resolve(dir.path().join("chain.trig"), None).unwrap()),
        output: OutputTarget::resolve(Some(dir.path().join("tail.trig")), None).unwrap(),
        all_output: Some(OutputTarget::resolve(Some(dir.path().join("all.trig")), None).unwrap()),
        table: Some(dir.path().join("table.csv")),
        index: fixed_metadata(2),
    };
    let summaries = run_index_reuse(&second).unwrap();
    assert_eq!(summaries[0].reuse_count, 1);
    assert_eq!(summaries[0].new_pages, 1);
    assert_eq!(fs::read_to_string(dir.path().join("table.csv")).unwrap(), "second.txt,1\n");

    let tail = read_corpus(&dir.path().join("tail.trig"));
    assert_eq!(elements_of(&tail), vec![element("c")]);
    let all = read_corpus(&dir.path().join("all.trig"));
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], chain[0], "reused page is echoed unchanged");
}
