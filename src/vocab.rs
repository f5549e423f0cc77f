//! IRI constants used across the crate.
//!
//! Grouped by vocabulary. Everything is a plain `&'static str` so that terms
//! can be compared against parsed IRIs without allocation.

// ─────────────────────────────────────────────────────────────────────────────
// RDF / XSD
// ─────────────────────────────────────────────────────────────────────────────

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:langString`
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
/// `xsd:string`
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:dateTime`
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
/// `rdfs:seeAlso`
pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";

// ─────────────────────────────────────────────────────────────────────────────
// Nanopublication schema
// ─────────────────────────────────────────────────────────────────────────────

/// `np:Nanopublication`
pub const NP_NANOPUBLICATION: &str = "http://www.nanopub.org/nschema#Nanopublication";
/// `np:hasAssertion`
pub const NP_HAS_ASSERTION: &str = "http://www.nanopub.org/nschema#hasAssertion";
/// `np:hasProvenance`
pub const NP_HAS_PROVENANCE: &str = "http://www.nanopub.org/nschema#hasProvenance";
/// `np:hasPublicationInfo`
pub const NP_HAS_PUBINFO: &str = "http://www.nanopub.org/nschema#hasPublicationInfo";

/// `npx:` namespace.
pub const NPX: &str = "http://purl.org/nanopub/x/";
/// `npx:supersedes`
pub const NPX_SUPERSEDES: &str = "http://purl.org/nanopub/x/supersedes";
/// `npx:NanopubIndex`
pub const NPX_NANOPUB_INDEX: &str = "http://purl.org/nanopub/x/NanopubIndex";
/// `npx:IncompleteIndex`
pub const NPX_INCOMPLETE_INDEX: &str = "http://purl.org/nanopub/x/IncompleteIndex";
/// `npx:includesElement`
pub const NPX_INCLUDES_ELEMENT: &str = "http://purl.org/nanopub/x/includesElement";
/// `npx:includesSubindex`
pub const NPX_INCLUDES_SUBINDEX: &str = "http://purl.org/nanopub/x/includesSubindex";
/// `npx:appendsIndex`
pub const NPX_APPENDS_INDEX: &str = "http://purl.org/nanopub/x/appendsIndex";

/// Prefix for IRIs minted before a trusty identity exists.
pub const TEMP_NANOPUB_PREFIX: &str = "http://purl.org/nanopub/temp/";
/// Default base for newly minted trusty identities.
pub const DEFAULT_BASE_URI: &str = "http://purl.org/np/";

// ─────────────────────────────────────────────────────────────────────────────
// Dublin Core / PROV / PAV
// ─────────────────────────────────────────────────────────────────────────────

/// `dct:created`
pub const DCT_CREATED: &str = "http://purl.org/dc/terms/created";
/// `dct:title`
pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";
/// `dct:description`
pub const DCT_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
/// `dct:creator`
pub const DCT_CREATOR: &str = "http://purl.org/dc/terms/creator";
/// `dct:isPartOf`
pub const DCT_IS_PART_OF: &str = "http://purl.org/dc/terms/isPartOf";

/// `prov:generatedAtTime`
pub const PROV_GENERATED_AT_TIME: &str = "http://www.w3.org/ns/prov#generatedAtTime";
/// `prov:wasAttributedTo`
pub const PROV_WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";

/// `pav:createdOn`
pub const PAV_CREATED_ON: &str = "http://purl.org/pav/createdOn";
/// PAV 1 `importedOn`
pub const PAV1_IMPORTED_ON: &str = "http://purl.org/pav/importedOn";
/// PAV 2 `importedOn`
pub const PAV2_IMPORTED_ON: &str = "http://purl.org/pav/2.0/importedOn";

/// Predicates recognized as recording a nanopublication's own creation time.
pub const CREATION_TIME_PREDICATES: &[&str] =
    &[DCT_CREATED, PROV_GENERATED_AT_TIME, PAV_CREATED_ON];

/// Whether `predicate` is one of the built-in creation-time predicates.
pub fn is_creation_time_predicate(predicate: &str) -> bool {
    CREATION_TIME_PREDICATES.contains(&predicate)
}

// ─────────────────────────────────────────────────────────────────────────────
// Placeholders
// ─────────────────────────────────────────────────────────────────────────────

/// `…/placeholders/head`
pub const PLACEHOLDER_HEAD: &str = "http://purl.org/nanopub/placeholders/head";
/// `…/placeholders/assertion`
pub const PLACEHOLDER_ASSERTION: &str = "http://purl.org/nanopub/placeholders/assertion";
/// `…/placeholders/provenance`
pub const PLACEHOLDER_PROVENANCE: &str = "http://purl.org/nanopub/placeholders/provenance";
/// `…/placeholders/pubinfo`
pub const PLACEHOLDER_PUBINFO: &str = "http://purl.org/nanopub/placeholders/pubinfo";
/// `…/placeholders/timestamp`
pub const PLACEHOLDER_TIMESTAMP: &str = "http://purl.org/nanopub/placeholders/timestamp";
/// `…/placeholders/disgenet-gda`
pub const PLACEHOLDER_DISGENET_GDA: &str = "http://purl.org/nanopub/placeholders/disgenet-gda";

// ─────────────────────────────────────────────────────────────────────────────
// Domain vocabularies
// ─────────────────────────────────────────────────────────────────────────────

/// WikiPathways `organismName`
pub const WP_ORGANISM_NAME: &str = "http://vocabularies.wikipathways.org/wp#organismName";
/// WikiPathways `pathwayOntologyTag`
pub const WP_PATHWAY_ONTOLOGY_TAG: &str =
    "http://vocabularies.wikipathways.org/wp#pathwayOntologyTag";
/// Prefix stripped from WikiPathways pathway identifiers.
pub const WIKIPATHWAYS_ID_PREFIX: &str = "http://identifiers.org/wikipathways/";

/// Wikidata "found in taxon".
pub const WDT_P703: &str = "http://www.wikidata.org/prop/direct/P703";
/// CHEMINF InChIKey descriptor.
pub const CHEMINF_000399: &str = "http://semanticscience.org/resource/CHEMINF_000399";
/// SIO "has source".
pub const SIO_000253: &str = "http://semanticscience.org/resource/SIO_000253";
/// Wikidata itself, skipped as a species source.
pub const WIKIDATA_Q2013: &str = "http://www.wikidata.org/entity/Q2013";

/// DisGeNET gene-disease association resources.
pub const DISGENET_GDA_PREFIX: &str = "http://rdf.disgenet.org/resource/gda/";
/// Legacy DisGeNET association namespace.
pub const DISGENET_GDA_LEGACY_PREFIX: &str =
    "http://rdf.disgenet.org/gene-disease-association.ttl#";
