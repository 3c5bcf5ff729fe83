use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// One accomplishment line under an experience entry.
///
/// `id` is stable for the life of a tailoring run; only `text` and
/// `is_modified` may change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_modified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub title: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// One labelled point of the "why I'm the right fit" block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhyFitPoint {
    pub label: String,
    pub text: String,
}

/// Structured résumé content as stored by the résumé collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContent {
    pub contact: ContactInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    /// Added by tailoring only; never present on a stored original.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_fit: Option<Vec<WhyFitPoint>>,
}

impl ResumeContent {
    /// Iterates every bullet in document order together with its parent entry.
    pub fn bullets(&self) -> impl Iterator<Item = (&Experience, &Bullet)> {
        self.experience
            .iter()
            .flat_map(|exp| exp.bullets.iter().map(move |b| (exp, b)))
    }

    pub fn bullet_count(&self) -> usize {
        self.experience.iter().map(|e| e.bullets.len()).sum()
    }

    /// First id repeated among experiences, bullets or education entries.
    /// Ids are compared within each kind.
    pub fn first_duplicate_id(&self) -> Option<&str> {
        let experience = self.experience.iter().map(|e| e.id.as_str());
        let bullets = self.bullets().map(|(_, b)| b.id.as_str());
        let education = self.education.iter().map(|e| e.id.as_str());
        first_repeat(experience)
            .or_else(|| first_repeat(bullets))
            .or_else(|| first_repeat(education))
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.as_deref().unwrap_or(&[])
    }

    pub fn certifications(&self) -> &[String] {
        self.skills.certifications.as_deref().unwrap_or(&[])
    }

    pub fn languages(&self) -> &[String] {
        self.skills.languages.as_deref().unwrap_or(&[])
    }

    /// Lowercase text of all experience bullets and titles.
    pub fn experience_text(&self) -> String {
        self.experience
            .iter()
            .flat_map(|e| {
                std::iter::once(e.title.as_str()).chain(e.bullets.iter().map(|b| b.text.as_str()))
            })
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase()
    }

    /// Lowercase text of the skills block (technical, soft, certifications).
    pub fn skills_text(&self) -> String {
        self.skills
            .technical
            .iter()
            .chain(self.skills.soft.iter())
            .chain(self.certifications().iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase()
    }

    /// Lowercase text of project names, descriptions and technologies.
    pub fn projects_text(&self) -> String {
        self.projects()
            .iter()
            .flat_map(|p| {
                [p.name.as_str(), p.description.as_str()]
                    .into_iter()
                    .chain(p.technologies.iter().map(String::as_str))
            })
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase()
    }
}

fn first_repeat<'a>(mut ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = BTreeSet::new();
    ids.find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experience(id: &str, bullet_ids: &[&str]) -> Experience {
        Experience {
            id: id.into(),
            bullets: bullet_ids
                .iter()
                .map(|b| Bullet {
                    id: (*b).into(),
                    text: "Shipped it".into(),
                    is_modified: false,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicate_bullet_id_across_experiences() {
        let resume = ResumeContent {
            experience: vec![experience("e1", &["b1"]), experience("e2", &["b1"])],
            ..Default::default()
        };
        assert_eq!(resume.first_duplicate_id(), Some("b1"));
    }

    #[test]
    fn test_duplicate_experience_and_education_ids() {
        let resume = ResumeContent {
            experience: vec![experience("e1", &["b1"]), experience("e1", &["b2"])],
            ..Default::default()
        };
        assert_eq!(resume.first_duplicate_id(), Some("e1"));

        let resume = ResumeContent {
            experience: vec![experience("e1", &["b1", "b2"])],
            education: vec![
                Education {
                    id: "ed1".into(),
                    ..Default::default()
                },
                Education {
                    id: "ed1".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(resume.first_duplicate_id(), Some("ed1"));
    }

    #[test]
    fn test_unique_ids_pass() {
        let resume = ResumeContent {
            experience: vec![experience("e1", &["b1", "b2"]), experience("e2", &["b3"])],
            ..Default::default()
        };
        assert_eq!(resume.first_duplicate_id(), None);
    }

    #[test]
    fn test_resume_deserializes_camel_case_with_defaults() {
        let json = r#"{
            "contact": {"name": "Ada"},
            "experience": [{
                "id": "e1",
                "company": "Acme",
                "title": "Engineer",
                "startDate": "2021-01",
                "bullets": [{"id": "b1", "text": "Built things"}]
            }],
            "skills": {"technical": ["Rust"], "soft": []}
        }"#;
        let resume: ResumeContent = serde_json::from_str(json).unwrap();
        assert_eq!(resume.bullet_count(), 1);
        assert!(!resume.experience[0].bullets[0].is_modified);
        assert!(resume.summary_text().is_none());
        assert!(resume.projects().is_empty());
    }

    #[test]
    fn test_why_fit_is_omitted_when_absent() {
        let resume = ResumeContent::default();
        let value = serde_json::to_value(&resume).unwrap();
        assert!(value.get("whyFit").is_none());
    }

    #[test]
    fn test_bullets_iterates_in_document_order() {
        let resume = ResumeContent {
            experience: vec![
                Experience {
                    id: "e1".into(),
                    bullets: vec![
                        Bullet { id: "b1".into(), ..Default::default() },
                        Bullet { id: "b2".into(), ..Default::default() },
                    ],
                    ..Default::default()
                },
                Experience {
                    id: "e2".into(),
                    bullets: vec![Bullet { id: "b3".into(), ..Default::default() }],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let ids: Vec<_> = resume.bullets().map(|(e, b)| (e.id.as_str(), b.id.as_str())).collect();
        assert_eq!(ids, vec![("e1", "b1"), ("e1", "b2"), ("e2", "b3")]);
    }
}
