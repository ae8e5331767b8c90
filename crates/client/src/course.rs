use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A course, as stored in the `Courses` collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Storage key of the document. Overwritten with the real key when read back.
    #[serde(rename = "courseID", default)]
    pub id: String,

    #[serde(rename = "courseName", default)]
    pub name: String,

    /// Free-form, eg. "6 weeks"
    #[serde(rename = "courseDuration", default)]
    pub duration: String,

    /// Either prose or a link to an image
    #[serde(rename = "courseDescription", default)]
    pub description: String,
}

impl Course {
    /// Generate a fresh id for a new course
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The description, if it looks like something we could show as an image.
    pub fn image_url(&self) -> Option<&str> {
        static IMAGE_URL: OnceLock<Regex> = OnceLock::new();
        let re = IMAGE_URL.get_or_init(|| Regex::new(r"(?i)^https?://\S").unwrap());

        re.is_match(&self.description)
            .then_some(self.description.as_str())
    }

    /// Pre-fill for editing this course
    pub fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            name: self.name.clone(),
            duration: self.duration.clone(),
            description: self.description.clone(),
        }
    }
}

/// User input for a course that hasn't been given an id yet
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseDraft {
    pub name: String,
    pub duration: String,
    pub description: String,
}

/// The first field of a [`CourseDraft`] that was left blank
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    #[error("Please enter course name")]
    Name,

    #[error("Please enter course duration")]
    Duration,

    #[error("Please enter course description")]
    Description,
}

impl CourseDraft {
    pub fn new(
        name: impl Into<String>,
        duration: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            duration: duration.into(),
            description: description.into(),
        }
    }

    /// Check every field has something in it, reporting the first that doesn't.
    pub fn validate(&self) -> Result<(), MissingField> {
        if self.name.trim().is_empty() {
            Err(MissingField::Name)
        } else if self.duration.trim().is_empty() {
            Err(MissingField::Duration)
        } else if self.description.trim().is_empty() {
            Err(MissingField::Description)
        } else {
            Ok(())
        }
    }

    pub fn into_course(self, id: String) -> Course {
        Course {
            id,
            name: self.name,
            duration: self.duration,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_with_description(description: &str) -> Course {
        CourseDraft::new("n", "d", description).into_course("id".into())
    }

    #[test]
    fn test_validate_reports_first_blank() {
        assert_eq!(
            CourseDraft::new("", "", "").validate(),
            Err(MissingField::Name)
        );
        assert_eq!(
            CourseDraft::new("Algebra", "  ", "").validate(),
            Err(MissingField::Duration)
        );
        assert_eq!(
            CourseDraft::new("Algebra", "6 weeks", "\t").validate(),
            Err(MissingField::Description)
        );
        assert_eq!(
            CourseDraft::new("Algebra", "6 weeks", "x").validate(),
            Ok(())
        );
    }

    #[test]
    fn test_missing_field_messages() {
        assert_eq!(MissingField::Name.to_string(), "Please enter course name");
        assert_eq!(
            MissingField::Description.to_string(),
            "Please enter course description"
        );
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            course_with_description("https://img/x.png").image_url(),
            Some("https://img/x.png")
        );
        assert_eq!(
            course_with_description("HTTP://img/x.png").image_url(),
            Some("HTTP://img/x.png")
        );
        assert_eq!(course_with_description("http stuff").image_url(), None);
        assert_eq!(course_with_description("ftp://img").image_url(), None);
        assert_eq!(course_with_description("about http://x").image_url(), None);
    }

    #[test]
    fn test_wire_names() {
        let course = CourseDraft::new("Algebra", "6 weeks", "Sums").into_course("abc".into());
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "courseID": "abc",
                "courseName": "Algebra",
                "courseDuration": "6 weeks",
                "courseDescription": "Sums",
            })
        );

        let partial: Course = serde_json::from_value(serde_json::json!({
            "courseName": "Algebra",
        }))
        .unwrap();
        assert_eq!(partial.name, "Algebra");
        assert_eq!(partial.id, "");
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(Course::new_id(), Course::new_id());
        assert!(!Course::new_id().is_empty());
    }
}
