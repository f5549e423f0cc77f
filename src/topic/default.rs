//! Main-subject topic extraction.

use std::collections::{BTreeMap, BTreeSet};

use super::{TopicExtractor, TopicOptions};
use crate::types::{Nanopub, Statement, Term};

/// Topic text of a subject term.
pub(crate) fn subject_key(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.clone(),
        Term::Blank(label) => format!("_:{}", label),
        Term::Literal(lit) => lit.lexical.clone(),
    }
}

/// The assertion subject heading the most statements.
///
/// Subjects equal to the nanopublication's identity and statements rejected
/// by `skip` are not counted. A tie at the maximum yields `None`.
pub fn main_subject(nanopub: &Nanopub, skip: impl Fn(&Statement) -> bool) -> Option<String> {
    let mut counts: BTreeMap<&Term, usize> = BTreeMap::new();
    for st in nanopub.assertion() {
        if st.has_subject(nanopub.uri()) || skip(st) {
            continue;
        }
        *counts.entry(&st.subject).or_default() += 1;
    }

    let max = counts.values().copied().max()?;
    let mut leaders = counts.iter().filter(|(_, c)| **c == max);
    let (leader, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(subject_key(leader))
}

/// Main-subject strategy with a configurable predicate ignore-list.
#[derive(Debug, Clone, Default)]
pub struct DefaultTopicExtractor {
    ignore: BTreeSet<String>,
}

impl DefaultTopicExtractor {
    /// Strategy ignoring `options.ignore_predicates`.
    pub fn new(options: &TopicOptions) -> Self {
        Self {
            ignore: options.ignore_predicates.iter().cloned().collect(),
        }
    }
}

impl TopicExtractor for DefaultTopicExtractor {
    fn name(&self) -> &'static str {
        "default"
    }

    fn topic(&self, nanopub: &Nanopub) -> Option<String> {
        main_subject(nanopub, |st| self.ignore.contains(&st.predicate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::tests::make_nanopub;

    fn t(iri: &str) -> Term {
        Term::iri(iri)
    }

    #[test]
    fn test_unique_maximum_wins() {
        let np = make_nanopub(
            "http://ex.org/np1",
            &[
                (t("http://ex.org/a"), "http://ex.org/p", t("http://ex.org/x")),
                (t("http://ex.org/a"), "http://ex.org/q", t("http://ex.org/y")),
                (t("http://ex.org/b"), "http://ex.org/p", t("http://ex.org/x")),
            ],
            &[],
        );
        assert_eq!(DefaultTopicExtractor::default().topic(&np).as_deref(), Some("http://ex.org/a"));
    }

    #[test]
    fn test_tie_is_undefined() {
        let np = make_nanopub(
            "http://ex.org/np1",
            &[
                (t("http://ex.org/a"), "http://ex.org/p", t("http://ex.org/x")),
                (t("http://ex.org/b"), "http://ex.org/p", t("http://ex.org/x")),
            ],
            &[],
        );
        assert_eq!(DefaultTopicExtractor::default().topic(&np), None);
    }

    #[test]
    fn test_ignored_predicates_break_tie() {
        let np = make_nanopub(
            "http://ex.org/np1",
            &[
                (t("http://ex.org/a"), "http://ex.org/p", t("http://ex.org/x")),
                (t("http://ex.org/b"), "http://ex.org/label", Term::string("b")),
            ],
            &[],
        );
        let extractor = DefaultTopicExtractor::new(&TopicOptions::from_ignore_list("http://ex.org/label"));
        assert_eq!(extractor.topic(&np).as_deref(), Some("http://ex.org/a"));
    }

    #[test]
    fn test_self_subject_not_counted() {
        let np = make_nanopub(
            "http://ex.org/np1",
            &[
                (t("http://ex.org/np1"), "http://ex.org/p", t("http://ex.org/x")),
                (t("http://ex.org/np1"), "http://ex.org/q", t("http://ex.org/x")),
                (t("http://ex.org/a"), "http://ex.org/p", t("http://ex.org/x")),
            ],
            &[],
        );
        assert_eq!(DefaultTopicExtractor::default().topic(&np).as_deref(), Some("http://ex.org/a"));
    }

    #[test]
    fn test_only_self_subjects_is_undefined() {
        let np = make_nanopub(
            "http://ex.org/np1",
            &[(t("http://ex.org/np1"), "http://ex.org/p", t("http://ex.org/x"))],
            &[],
        );
        assert_eq!(DefaultTopicExtractor::default().topic(&np), None);
    }
}
