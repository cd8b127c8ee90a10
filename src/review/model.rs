//! Review request and result model
//!
//! The JSON field names here are the service's wire format and the layout of
//! repository entries in the cache, so they must not change.

use crate::error::CriticResult;
use crate::source::RepositoryCoordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience level the requester declares for the author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeveloperLevel {
    Junior,
    Middle,
    Senior,
}

impl fmt::Display for DeveloperLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Junior => "junior",
            Self::Middle => "middle",
            Self::Senior => "senior",
        };
        write!(f, "{}", name)
    }
}

/// A request to review a repository against task requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub task_requirements: String,
    pub git_hub_url: String,
    pub developer_level: DeveloperLevel,
}

impl ReviewRequest {
    /// Validate the repository link without touching the network
    pub fn coordinate(&self) -> CriticResult<RepositoryCoordinate> {
        RepositoryCoordinate::parse(&self.git_hub_url)
    }
}

/// Repository score on a 0 to 5 scale
///
/// 0 is completely inadequate, 5 needs no improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MAX: u8 = 5;

    /// Accept a grade only inside the 0..=5 range
    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Grade {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("grade {} outside 0..={}", value, Self::MAX))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Identity of the repository state that was reviewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub repository_hash: String,
}

/// Final review of one repository state
///
/// Built once per repository identity, stored verbatim and returned
/// unchanged on every later request for the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoReview {
    pub message: String,
    pub level: DeveloperLevel,
    #[serde(default)]
    pub grade: Option<Grade>,
    pub repository: RepositoryInfo,
    pub file_names: Vec<String>,
}

impl RepoReview {
    /// Serialized form stored in the cache
    pub fn to_record(&self) -> CriticResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored record
    pub fn from_record(record: &str) -> CriticResult<Self> {
        Ok(serde_json::from_str(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RepoReview {
        RepoReview {
            message: "Solid structure, thin tests.".to_string(),
            level: DeveloperLevel::Middle,
            grade: Grade::new(4),
            repository: RepositoryInfo {
                repository_hash: "abc123".to_string(),
            },
            file_names: vec!["a.py".to_string(), "b.py".to_string()],
        }
    }

    #[test]
    fn grade_bounds() {
        for v in 0..=5 {
            assert_eq!(Grade::new(v).map(Grade::value), Some(v as u8));
        }
        assert!(Grade::new(-1).is_none());
        assert!(Grade::new(6).is_none());
        assert!(Grade::new(i64::MAX).is_none());
    }

    #[test]
    fn record_is_lossless() {
        let review = sample();
        let record = review.to_record().unwrap();
        assert_eq!(RepoReview::from_record(&record).unwrap(), review);
        // Re-serializing the parsed record reproduces the stored bytes
        assert_eq!(RepoReview::from_record(&record).unwrap().to_record().unwrap(), record);
    }

    #[test]
    fn wire_format_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["level"], "middle");
        assert_eq!(value["grade"], 4);
        assert_eq!(value["repository"]["repository_hash"], "abc123");
        assert_eq!(value["file_names"][1], "b.py");
    }

    #[test]
    fn null_grade_accepted() {
        let json = r#"{"message":"m","level":"junior","grade":null,
            "repository":{"repository_hash":"h"},"file_names":[]}"#;
        assert_eq!(RepoReview::from_record(json).unwrap().grade, None);
    }

    #[test]
    fn out_of_range_grade_rejected() {
        let json = r#"{"message":"m","level":"junior","grade":7,
            "repository":{"repository_hash":"h"},"file_names":[]}"#;
        assert!(RepoReview::from_record(json).is_err());
    }

    #[test]
    fn request_defaults_requirements() {
        let req: ReviewRequest = serde_json::from_str(
            r#"{"git_hub_url":"https://github.com/o/r","developer_level":"senior"}"#,
        )
        .unwrap();
        assert_eq!(req.task_requirements, "");
        assert_eq!(req.developer_level, DeveloperLevel::Senior);
        assert_eq!(req.coordinate().unwrap().repo, "r");
    }

    #[test]
    fn unknown_level_rejected() {
        let res: Result<ReviewRequest, _> = serde_json::from_str(
            r#"{"git_hub_url":"https://github.com/o/r","developer_level":"lead"}"#,
        );
        assert!(res.is_err());
    }
}
