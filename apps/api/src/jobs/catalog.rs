//! Static job listings shown by the application form, grouped per ATS platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const BUILTIN_LISTINGS: &str = include_str!("../../data/job_listings.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    YesNo,
    Text,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::YesNo => "YES_NO",
            QuestionType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobQuestion {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStage {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub status: String,
    pub location: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub stages: Vec<JobStage>,
    #[serde(default)]
    pub questions: Vec<JobQuestion>,
}

impl JobListing {
    /// Applications enter at the job's first stage; "1" when the job lists none.
    pub fn initial_stage_id(&self) -> &str {
        self.stages.first().map(|s| s.id.as_str()).unwrap_or("1")
    }

    pub fn is_open(&self) -> bool {
        self.status == "OPEN"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsListings {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub jobs: Vec<JobListing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformOverview {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub job_count: usize,
    pub open_jobs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogOverview {
    pub total_platforms: usize,
    pub total_jobs: usize,
    pub platforms: Vec<PlatformOverview>,
}

#[derive(Debug, Clone)]
pub struct JobCatalog {
    platforms: Vec<AtsListings>,
}

impl JobCatalog {
    /// Listings compiled into the binary.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_LISTINGS)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            platforms: serde_json::from_str(raw)?,
        })
    }

    pub fn platform(&self, key: &str) -> Option<&AtsListings> {
        self.platforms.iter().find(|p| p.key == key)
    }

    pub fn job(&self, key: &str, job_id: &str) -> Option<&JobListing> {
        self.platform(key)?.jobs.iter().find(|j| j.id == job_id)
    }

    pub fn overview(&self) -> CatalogOverview {
        CatalogOverview {
            total_platforms: self.platforms.len(),
            total_jobs: self.platforms.iter().map(|p| p.jobs.len()).sum(),
            platforms: self
                .platforms
                .iter()
                .map(|p| PlatformOverview {
                    key: p.key.clone(),
                    name: p.name.clone(),
                    icon: p.icon.clone(),
                    color: p.color.clone(),
                    job_count: p.jobs.len(),
                    open_jobs: p.jobs.iter().filter(|j| j.is_open()).count(),
                })
                .collect(),
        }
    }
}
