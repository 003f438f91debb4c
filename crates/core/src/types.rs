use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix used to turn a stored video token into a playable link.
pub const YOUTUBE_WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Course category, serialized and stored by its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Frontend,
    Backend,
    DataScience,
    DevOps,
    Database,
    Mobile,
    Cloud,
    Security,
    Design,
    Testing,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Frontend,
        Self::Backend,
        Self::DataScience,
        Self::DevOps,
        Self::Database,
        Self::Mobile,
        Self::Cloud,
        Self::Security,
        Self::Design,
        Self::Testing,
    ];

    /// Returns the display label used on the wire and in the `courses.category` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "Front-end",
            Self::Backend => "Back-end",
            Self::DataScience => "Data Science",
            Self::DevOps => "DevOps",
            Self::Database => "Banco de Dados",
            Self::Mobile => "Mobile",
            Self::Cloud => "Cloud",
            Self::Security => "Security",
            Self::Design => "Design",
            Self::Testing => "Testing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| UnknownLabel::new("category", value))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Category::from_str(&value).map_err(D::Error::custom)
    }
}

/// Visibility of a course. Soft deletion moves a course to [`Status::Inactive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            other => Err(UnknownLabel::new("status", other)),
        }
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Status::from_str(&value).map_err(D::Error::custom)
    }
}

/// Raised when a label does not name any variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownLabel {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A persisted course together with the lessons it owns.
///
/// `lessons` is only populated by the `*_with_lessons` queries; the flat
/// listing queries leave it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub status: Status,
    pub lessons: Vec<Lesson>,
}

/// A persisted lesson. Every lesson belongs to exactly one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: i64,
    pub name: String,
    /// Opaque video token, not a full URL.
    pub youtube_url: String,
    pub course_id: i64,
}

impl Lesson {
    /// Composes the stored token into a playable link.
    pub fn full_youtube_url(&self) -> String {
        format!("{YOUTUBE_WATCH_PREFIX}{}", self.youtube_url)
    }
}

/// Course data supplied by a caller before the store assigns identifiers.
///
/// `id` carries whatever the client sent so the update path can check it
/// against the path id; the store never reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub id: Option<i64>,
    pub name: String,
    pub category: Category,
    /// Left untouched on update when `None`; defaults to active on insert.
    pub status: Option<Status>,
    pub lessons: Vec<LessonDraft>,
}

/// Lesson data supplied by a caller. The owning course comes from context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDraft {
    pub id: Option<i64>,
    pub name: String,
    pub youtube_url: String,
}

/// Returns `true` when a client-supplied id is absent or matches the path id.
pub fn ids_consistent(path_id: i64, body_id: Option<i64>) -> bool {
    body_id.map_or(true, |id| id == path_id)
}
