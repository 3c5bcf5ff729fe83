use serde::{Deserialize, Serialize};

/// The target job posting a résumé is tailored against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    pub title: String,
    pub company_name: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JobData {
    /// All job text in one lowercase blob, used for lexical lookups.
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![self.title.as_str(), self.description.as_str()];
        parts.extend(self.requirements.iter().map(String::as_str));
        parts.extend(self.skills.iter().map(String::as_str));
        parts.join("\n").to_lowercase()
    }
}
