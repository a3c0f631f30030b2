//! Pluggable seam for label sources that aren't modeled as
//! [`kgdb_graph::GraphStore`] columns: Wikipedia's title-keyed
//! redirect-of set and DBpedia's alias/redirect-of sets. The original
//! system keeps these in their own per-source stores (`DBWikipedia`,
//! `DBDBpedia`); `kgdb-labels` only needs read access to them while
//! building the vocabulary, so it depends on a trait rather than on
//! `kgdb-graph` growing source-specific columns.

/// Looks up supplementary label candidates for one entity's Wikipedia
/// title or DBpedia resource name. Every method defaults to "nothing
/// extra", so a vocabulary build that only has Wikidata data can pass
/// [`NoExternalSources`] unchanged.
pub trait ExternalLabelSource {
    /// Other Wikipedia titles that redirect to `wikipedia_title`.
    fn wikipedia_redirects_of(&self, wikipedia_title: &str) -> Vec<String> {
        let _ = wikipedia_title;
        Vec::new()
    }
    /// DBpedia's English alias set (`dbo:label`-adjacent) for `dbpedia_resource`.
    fn dbpedia_aliases_en(&self, dbpedia_resource: &str) -> Vec<String> {
        let _ = dbpedia_resource;
        Vec::new()
    }
    /// DBpedia's all-language alias set for `dbpedia_resource`.
    fn dbpedia_aliases_all(&self, dbpedia_resource: &str) -> Vec<String> {
        let _ = dbpedia_resource;
        Vec::new()
    }
    /// Other DBpedia resource names that redirect to `dbpedia_resource`.
    fn dbpedia_redirects_of(&self, dbpedia_resource: &str) -> Vec<String> {
        let _ = dbpedia_resource;
        Vec::new()
    }
}

/// An [`ExternalLabelSource`] with no supplementary data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalSources;

impl ExternalLabelSource for NoExternalSources {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_methods_return_empty() {
        let src = NoExternalSources;
        assert!(src.wikipedia_redirects_of("Tokyo").is_empty());
        assert!(src.dbpedia_aliases_en("Tokyo").is_empty());
    }

    struct Fixture;
    impl ExternalLabelSource for Fixture {
        fn wikipedia_redirects_of(&self, title: &str) -> Vec<String> {
            if title == "Tokyo" {
                vec!["Tokyo, Japan".to_string()]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn custom_source_overrides_one_method() {
        let src = Fixture;
        assert_eq!(src.wikipedia_redirects_of("Tokyo"), vec!["Tokyo, Japan".to_string()]);
        assert!(src.dbpedia_aliases_en("Tokyo").is_empty());
    }
}
