//! The ordered chapter list plans are built from.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::task::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    pub category: Category,
}

impl Chapter {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

/// Non-empty, ordered list of chapters. One chapter is studied per week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllabus {
    chapters: Vec<Chapter>,
}

impl Syllabus {
    pub fn new(chapters: Vec<Chapter>) -> Result<Self, ValidationError> {
        if chapters.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "syllabus".into(),
                message: "at least one chapter is required".into(),
            });
        }
        Ok(Self { chapters })
    }

    /// The twelve-chapter syllabus for the applied information technology
    /// exam. Foundations and algorithms are deliberately studied last.
    pub fn standard() -> Self {
        use Category::*;
        let chapters = [
            ("3. Computer Components", Technology),
            ("4. System Components", Technology),
            ("5. Software and Operating Systems", Technology),
            ("6. Databases", Technology),
            ("7. Networks", Technology),
            ("8. Security", Technology),
            ("9. System Development", Technology),
            ("10. Project and Service Management", Management),
            ("11. Business and System Strategy", Strategy),
            ("12. Corporate Activity and Legal Affairs", Strategy),
            ("1. Fundamental Theory (Discrete and Applied Math)", Technology),
            ("2. Algorithms and Programming", Technology),
        ];
        Self {
            chapters: chapters
                .into_iter()
                .map(|(name, category)| Chapter::new(name, category))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Chapter for a zero-based week, wrapping around the syllabus.
    pub fn for_week(&self, week_index: usize) -> &Chapter {
        &self.chapters[week_index % self.chapters.len()]
    }
}

impl Default for Syllabus {
    fn default() -> Self {
        Self::standard()
    }
}
