//! # Course Catalog
//!
//! Static course catalog, loaded from `config/courses.json`.
//! The document is either a bare array of courses or `{ "courses": [...] }`.

use crate::error::{PaymentError, PaymentResult};
use crate::money::Price;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A course listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Integer id used in `?id=` lookups
    pub id: u32,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Long description (HTML fragment)
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,

    /// Human-readable duration (e.g. "6 weeks")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub syllabus: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Course>),
    Wrapped { courses: Vec<Course> },
}

/// In-memory course catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseCatalog {
    pub courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog JSON document
    pub fn from_json(json: &str) -> PaymentResult<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)
            .map_err(|e| PaymentError::Serialization(format!("Invalid course catalog: {}", e)))?;
        let courses = match doc {
            CatalogDocument::List(courses) => courses,
            CatalogDocument::Wrapped { courses } => courses,
        };
        Ok(Self { courses })
    }

    /// Load a catalog JSON file
    pub fn load(path: impl AsRef<Path>) -> PaymentResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PaymentError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Look up a course by id
    pub fn get(&self, id: u32) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Look up a course by id, failing with `CourseNotFound`
    pub fn require(&self, id: u32) -> PaymentResult<&Course> {
        self.get(id)
            .ok_or(PaymentError::CourseNotFound { course_id: id })
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    const CATALOG: &str = r#"[
        {
            "id": 1,
            "title": "Rust for Backend Engineers",
            "description": "<p>Build services.</p>",
            "instructor": "R. Iyer",
            "price": { "amount": 149900, "currency": "INR" },
            "syllabus": ["Ownership", "Async"]
        },
        { "id": 2, "title": "Intro to UPI Payments" }
    ]"#;

    #[test]
    fn test_parse_bare_array() {
        let catalog = CourseCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let course = catalog.get(1).unwrap();
        assert_eq!(course.title, "Rust for Backend Engineers");
        assert_eq!(course.price, Some(Price::from_minor(149900, Currency::INR)));
        assert_eq!(course.syllabus.len(), 2);
        assert!(catalog.get(2).unwrap().description.is_empty());
    }

    #[test]
    fn test_parse_wrapped_document() {
        let json = r#"{ "courses": [ { "id": 9, "title": "Wrapped" } ] }"#;
        let catalog = CourseCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get(9).map(|c| c.title.as_str()), Some("Wrapped"));
    }

    #[test]
    fn test_require_missing_course() {
        let catalog = CourseCatalog::from_json(CATALOG).unwrap();
        assert!(matches!(
            catalog.require(404),
            Err(PaymentError::CourseNotFound { course_id: 404 })
        ));
    }

    #[test]
    fn test_invalid_catalog() {
        assert!(matches!(
            CourseCatalog::from_json("{\"nope\": true}"),
            Err(PaymentError::Serialization(_))
        ));
    }
}
