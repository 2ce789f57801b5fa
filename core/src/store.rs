//! Course content store abstraction
//!
//! The vector store is an external collaborator: this module only fixes the
//! shape of what the retrieval tools need from it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Search provider over course content and course metadata
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Search content chunks, optionally restricted to a course (partial names
    /// allowed) and a lesson number
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults;

    /// Link to a lesson, if the store knows one
    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String>;

    /// Outline of the course best matching `course_name`
    async fn course_outline(&self, course_name: &str) -> Option<CourseOutline>;

    /// Titles of every course in the catalog
    async fn course_titles(&self) -> Vec<String>;
}

/// Metadata attached to one retrieved chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub course_title: String,
    pub lesson_number: Option<u32>,
}

/// Results of a content search
///
/// `documents`, `metadata` and `distances` are parallel vectors. A failed
/// search is represented in-band through `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub distances: Vec<f32>,
    pub error: Option<String>,
}

impl SearchResults {
    /// Empty results carrying an error message
    pub fn empty<S: Into<String>>(error: S) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Whether the search returned no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate documents with their metadata
    pub fn hits(&self) -> impl Iterator<Item = (&str, &ChunkMetadata)> {
        self.documents
            .iter()
            .map(String::as_str)
            .zip(self.metadata.iter())
    }
}

/// One lesson in a course outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonEntry {
    pub number: u32,
    pub title: String,
    pub link: Option<String>,
}

/// Course structure as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    pub course_link: Option<String>,
    pub instructor: Option<String>,
    pub lessons: Vec<LessonEntry>,
}
