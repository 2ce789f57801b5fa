//! In-memory course catalog loaded from a JSON file
//!
//! A small keyword-matching stand-in for a vector store, good enough to try
//! the tools locally without any embedding infrastructure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use syllabus_core::{
    ChunkMetadata, CourseOutline, CourseStore, LessonEntry, SearchResults,
};

/// Catalog file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<CatalogCourse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCourse {
    pub title: String,
    pub course_link: Option<String>,
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<CatalogLesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLesson {
    pub lesson_number: u32,
    pub title: String,
    pub lesson_link: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Course store answering searches by term overlap
pub struct InMemoryCourseStore {
    courses: Vec<CatalogCourse>,
    max_results: usize,
}

struct Scored<'a> {
    score: usize,
    document: &'a str,
    course: &'a str,
    lesson: u32,
}

impl InMemoryCourseStore {
    pub fn new(catalog: Catalog, max_results: usize) -> Self {
        Self {
            courses: catalog.courses,
            max_results,
        }
    }

    /// Load a catalog file
    pub async fn load(path: &Path, max_results: usize) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read course catalog: {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse course catalog: {}", path.display()))?;

        tracing::debug!(
            courses = catalog.courses.len(),
            "loaded course catalog from {}",
            path.display()
        );
        Ok(Self::new(catalog, max_results))
    }

    /// Course whose title matches `name`: exact match first, then partial
    fn resolve_course(&self, name: &str) -> Option<&CatalogCourse> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.courses
            .iter()
            .find(|course| course.title.to_lowercase() == needle)
            .or_else(|| {
                self.courses
                    .iter()
                    .find(|course| course.title.to_lowercase().contains(&needle))
            })
    }
}

fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

/// Paragraph-sized chunks of a lesson
fn chunks(content: &str) -> impl Iterator<Item = &str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
}

fn score(query_terms: &[String], text: &str) -> usize {
    let text_terms = terms(text);
    query_terms
        .iter()
        .filter(|term| text_terms.contains(term))
        .count()
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        let courses: Vec<&CatalogCourse> = match course_name {
            Some(name) => match self.resolve_course(name) {
                Some(course) => vec![course],
                None => return SearchResults::empty(format!("No course found matching '{}'", name)),
            },
            None => self.courses.iter().collect(),
        };

        let query_terms = terms(query);
        let mut hits: Vec<Scored> = Vec::new();
        for course in courses {
            for lesson in &course.lessons {
                if lesson_number.is_some_and(|number| number != lesson.lesson_number) {
                    continue;
                }
                for chunk in chunks(&lesson.content) {
                    let overlap = score(&query_terms, chunk);
                    if overlap > 0 {
                        hits.push(Scored {
                            score: overlap,
                            document: chunk,
                            course: &course.title,
                            lesson: lesson.lesson_number,
                        });
                    }
                }
            }
        }

        // Stable sort keeps catalog order among equal scores.
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(self.max_results);

        let mut results = SearchResults::default();
        for hit in hits {
            results.documents.push(hit.document.to_string());
            results.metadata.push(ChunkMetadata {
                course_title: hit.course.to_string(),
                lesson_number: Some(hit.lesson),
            });
            results.distances.push(1.0 / (1.0 + hit.score as f32));
        }
        results
    }

    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        self.courses
            .iter()
            .find(|course| course.title == course_title)?
            .lessons
            .iter()
            .find(|lesson| lesson.lesson_number == lesson_number)?
            .lesson_link
            .clone()
    }

    async fn course_outline(&self, course_name: &str) -> Option<CourseOutline> {
        let course = self.resolve_course(course_name)?;
        Some(CourseOutline {
            title: course.title.clone(),
            course_link: course.course_link.clone(),
            instructor: course.instructor.clone(),
            lessons: course
                .lessons
                .iter()
                .map(|lesson| LessonEntry {
                    number: lesson.lesson_number,
                    title: lesson.title.clone(),
                    link: lesson.lesson_link.clone(),
                })
                .collect(),
        })
    }

    async fn course_titles(&self) -> Vec<String> {
        self.courses.iter().map(|course| course.title.clone()).collect()
    }
}
