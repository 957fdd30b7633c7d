use serde::{Deserialize, Serialize};

use crate::resumes::repo_types::Resume;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateResumeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeEnvelope {
    pub resume: Resume,
}

#[derive(Debug, Serialize)]
pub struct ResumeWithMessage {
    pub message: &'static str,
    pub resume: Resume,
}

#[derive(Debug, Serialize)]
pub struct ResumeList {
    pub resumes: Vec<Resume>,
}
