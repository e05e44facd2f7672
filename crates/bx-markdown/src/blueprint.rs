use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Blueprint decoding failure.
///
/// Unlike the markdown extractors, blueprint input is claimed-JSON from a
/// structured-output LLM call, so a decode failure is a real error rather
/// than an empty result.
#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("invalid blueprint JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structured blueprint document produced by the idea-generation flow.
///
/// Field names mirror the JSON keys the prompt template asks the model for.
/// Every section is optional; `to_markdown` renders only what is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Blueprint {
    #[serde(rename = "Roadmap", default, skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<Vec<RoadmapPhase>>,
    #[serde(
        rename = "User Stories",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_stories: Option<Vec<UserStory>>,
    #[serde(
        rename = "API Endpoints",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub api_endpoints: Option<Vec<ApiEndpoint>>,
    #[serde(
        rename = "Task Breakdown",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub task_breakdown: Option<BTreeMap<String, Vec<String>>>,
    #[serde(
        rename = "System Architecture",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub system_architecture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RoadmapPhase {
    pub phase: String,
    pub value: String,
    pub outcomes: String,
    #[serde(default)]
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserStory {
    pub role: String,
    pub benefit: String,
    pub feature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ApiEndpoint {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub request: String,
    #[serde(default)]
    pub response: String,
    pub description: String,
}

impl Blueprint {
    /// Decode a blueprint from the JSON the LLM returned.
    pub fn from_json(input: &str) -> Result<Self, BlueprintError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Render the blueprint as the markdown narrative the host stores.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        if let Some(roadmap) = &self.roadmap {
            out.push_str("## 🗺️ Project Roadmap\n\n");
            for phase in roadmap {
                let _ = writeln!(out, "### {}", phase.phase);
                let _ = writeln!(out, "- **Value:** {}", phase.value);
                let _ = writeln!(out, "- **Outcomes:** {}", phase.outcomes);
                out.push_str("- **Milestones:**\n");
                for milestone in &phase.milestones {
                    let _ = writeln!(out, "  - {milestone}");
                }
                out.push('\n');
            }
        }

        if let Some(stories) = &self.user_stories {
            out.push_str("## 👥 User Stories\n\n");
            for story in stories {
                let _ = writeln!(
                    out,
                    "> As a **{}**, I want to **{}** so that **{}**.\n",
                    story.role, story.feature, story.benefit
                );
            }
        }

        if let Some(endpoints) = &self.api_endpoints {
            out.push_str("## 🔗 API Endpoints\n\n");
            out.push_str("| Method | Path | Description |\n");
            out.push_str("|:---|:---|:---|\n");
            for endpoint in endpoints {
                let _ = writeln!(
                    out,
                    "| `{}` | `{}` | {} |",
                    endpoint.method, endpoint.path, endpoint.description
                );
            }
            out.push('\n');
        }

        if let Some(tasks) = &self.task_breakdown {
            out.push_str("## 🔨 Task Breakdown\n\n");
            for (category, entries) in tasks {
                let _ = writeln!(out, "### {category}");
                for task in entries {
                    let _ = writeln!(out, "- [ ] {task}");
                }
                out.push('\n');
            }
        }

        if let Some(architecture) = &self.system_architecture {
            out.push_str("## 🏗️ System Architecture\n\n");
            let _ = writeln!(out, "{architecture}\n");
        }

        out.trim().to_string()
    }
}
