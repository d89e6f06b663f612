//! Parsing of ontology flat files into an [`crate::ontology::OntologySource`]

/// Module to parse OBO 1.2/1.4 flat files (`MPheno_OBO.ontology`, `HumanDO.obo`, `hp.obo`)
pub mod obo;
