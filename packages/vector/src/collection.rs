//! In-memory vector collections with brute-force search.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use kvgrid_value::NativeValue;

use crate::distance::cosine_similarity;
use crate::error::{Result, VectorError};

/// A vector wrapped for storage or querying.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorValues(pub Vec<f32>);

impl VectorValues {
    pub fn of(values: Vec<f32>) -> Self {
        Self(values)
    }

    fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(VectorError::InvalidVector("vector is empty".to_string()));
        }
        if let Some(i) = self.0.iter().position(|v| !v.is_finite()) {
            return Err(VectorError::InvalidVector(format!(
                "non-finite value at index {}",
                i
            )));
        }
        Ok(())
    }
}

/// A stored value together with its vector.
#[derive(Debug, Clone)]
pub struct VectorDocument {
    pub value: NativeValue,
    pub vector: VectorValues,
}

impl VectorDocument {
    pub fn of(value: NativeValue, vector: VectorValues) -> Self {
        Self { value, vector }
    }
}

/// What a search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: usize,
    pub include_value: bool,
    pub include_vectors: bool,
}

impl SearchOptions {
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }
}

/// Builder for [`SearchOptions`]. Defaults to 10 results, keys and scores only.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptionsBuilder {
    options: SearchOptions,
}

impl Default for SearchOptionsBuilder {
    fn default() -> Self {
        Self {
            options: SearchOptions {
                limit: 10,
                include_value: false,
                include_vectors: false,
            },
        }
    }
}

impl SearchOptionsBuilder {
    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = limit;
        self
    }

    pub fn include_value(mut self) -> Self {
        self.options.include_value = true;
        self
    }

    pub fn include_vectors(mut self) -> Self {
        self.options.include_vectors = true;
        self
    }

    pub fn build(self) -> SearchOptions {
        self.options
    }
}

/// One ranked search result.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub key: NativeValue,
    pub score: f32,
    pub value: Option<NativeValue>,
    pub vector: Option<Vec<f32>>,
}

/// A named collection of documents.
///
/// All vectors in a collection share one dimension, fixed by the first
/// document stored. Deleting the last document frees it again.
#[derive(Debug)]
pub struct VectorCollection {
    name: String,
    dimension: Mutex<Option<usize>>,
    documents: RwLock<HashMap<String, VectorDocument>>,
}

impl VectorCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimension: Mutex::new(None),
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` while the collection is empty.
    pub fn dimension(&self) -> Option<usize> {
        *self.dimension.lock().unwrap()
    }

    fn check_dimension(&self, vector: &VectorValues, fix: bool) -> Result<()> {
        vector.validate()?;
        let mut dimension = self.dimension.lock().unwrap();
        match *dimension {
            Some(expected) if expected != vector.0.len() => Err(VectorError::DimensionMismatch {
                expected,
                actual: vector.0.len(),
            }),
            Some(_) => Ok(()),
            None => {
                if fix {
                    *dimension = Some(vector.0.len());
                }
                Ok(())
            }
        }
    }

    /// Store a document, returning the one it replaced.
    pub fn put(&self, key: &str, document: VectorDocument) -> Result<Option<VectorDocument>> {
        // Lock order: documents, then dimension.
        let mut documents = self.documents.write().unwrap();
        self.check_dimension(&document.vector, true)?;
        Ok(documents.insert(key.to_string(), document))
    }

    pub fn get(&self, key: &str) -> Option<VectorDocument> {
        self.documents.read().unwrap().get(key).cloned()
    }

    pub fn delete(&self, key: &str) -> Option<VectorDocument> {
        let mut documents = self.documents.write().unwrap();
        let removed = documents.remove(key);
        if documents.is_empty() {
            *self.dimension.lock().unwrap() = None;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `options.limit` most similar documents, best first. Equal scores
    /// are ordered by key.
    pub fn search(&self, query: &VectorValues, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let documents = self.documents.read().unwrap();
        self.check_dimension(query, false)?;
        if options.limit == 0 {
            return Ok(vec![]);
        }

        let mut scored: Vec<(&String, &VectorDocument, f32)> = documents
            .iter()
            .map(|(key, doc)| (key, doc, cosine_similarity(&query.0, &doc.vector.0)))
            .collect();
        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        scored.truncate(options.limit);

        Ok(scored
            .into_iter()
            .map(|(key, doc, score)| SearchResult {
                key: NativeValue::from(key.as_str()),
                score,
                value: options.include_value.then(|| doc.value.clone()),
                vector: options.include_vectors.then(|| doc.vector.0.clone()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: &str, vector: &[f32]) -> VectorDocument {
        VectorDocument::of(NativeValue::json(value), VectorValues::of(vector.to_vec()))
    }

    fn options(limit: usize) -> SearchOptions {
        SearchOptions::builder().limit(limit).include_value().build()
    }

    #[test]
    fn search_ranks_by_similarity() {
        let collection = VectorCollection::new("docs");
        collection.put("x", doc("\"x\"", &[1.0, 0.0])).unwrap();
        collection.put("y", doc("\"y\"", &[0.0, 1.0])).unwrap();
        collection.put("xy", doc("\"xy\"", &[1.0, 1.0])).unwrap();

        let results = collection
            .search(&VectorValues::of(vec![1.0, 0.1]), &options(2))
            .unwrap();
        let keys: Vec<_> = results.iter().map(|r| r.key.clone()).collect();
        assert_eq!(keys, vec![NativeValue::from("x"), NativeValue::from("xy")]);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].value, Some(NativeValue::json("\"x\"")));
        assert_eq!(results[0].vector, None);
    }

    #[test]
    fn ties_are_ordered_by_key() {
        let collection = VectorCollection::new("docs");
        collection.put("b", doc("1", &[1.0, 0.0])).unwrap();
        collection.put("a", doc("2", &[2.0, 0.0])).unwrap();

        let results = collection
            .search(&VectorValues::of(vec![1.0, 0.0]), &options(5))
            .unwrap();
        assert_eq!(results[0].key, NativeValue::from("a"));
        assert_eq!(results[1].key, NativeValue::from("b"));
    }

    #[test]
    fn dimension_is_fixed_by_first_put() {
        let collection = VectorCollection::new("docs");
        assert_eq!(collection.dimension(), None);
        collection.put("a", doc("1", &[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(collection.dimension(), Some(3));

        let err = collection.put("b", doc("1", &[1.0])).unwrap_err();
        assert_eq!(err, VectorError::DimensionMismatch { expected: 3, actual: 1 });
        assert!(collection
            .search(&VectorValues::of(vec![1.0, 2.0]), &options(1))
            .is_err());
    }

    #[test]
    fn invalid_vectors_are_rejected() {
        let collection = VectorCollection::new("docs");
        assert!(collection.put("a", doc("1", &[])).is_err());
        assert!(collection.put("a", doc("1", &[f32::NAN])).is_err());
        assert!(collection.is_empty());
    }

    #[test]
    fn put_get_delete() {
        let collection = VectorCollection::new("docs");
        assert!(collection.put("a", doc("1", &[1.0])).unwrap().is_none());
        assert!(collection.put("a", doc("2", &[2.0])).unwrap().is_some());
        assert_eq!(collection.get("a").unwrap().value, NativeValue::json("2"));
        assert!(collection.delete("a").is_some());
        assert!(collection.get("a").is_none());
        assert_eq!(collection.len(), 0);
    }

    #[test]
    fn search_on_empty_collection_returns_nothing() {
        let collection = VectorCollection::new("docs");
        let results = collection
            .search(&VectorValues::of(vec![1.0]), &options(3))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn emptied_collection_accepts_a_new_dimension() {
        let collection = VectorCollection::new("docs");
        collection.put("a", doc("1", &[1.0, 2.0, 3.0])).unwrap();
        collection.delete("a");
        assert_eq!(collection.dimension(), None);

        collection.put("b", doc("2", &[1.0, 2.0])).unwrap();
        assert_eq!(collection.dimension(), Some(2));
    }

    #[test]
    fn large_magnitude_vectors_rank_by_direction() {
        let collection = VectorCollection::new("docs");
        collection.put("same", doc("1", &[1e20, 1e20])).unwrap();
        collection.put("orth", doc("2", &[1e20, -1e20])).unwrap();

        let results = collection
            .search(&VectorValues::of(vec![1e20, 1e20]), &options(2))
            .unwrap();
        assert_eq!(results[0].key, NativeValue::from("same"));
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert!(results[1].score.abs() < 1e-6);
    }
}
