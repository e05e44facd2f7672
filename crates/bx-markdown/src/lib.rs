#![forbid(unsafe_code)]

//! Extraction of structured data from LLM-generated markdown blueprints.
//!
//! The upstream model is asked to follow a heading/bullet template, but its
//! output is untrusted: headings drift between English and Indonesian, carry
//! ordinal prefixes or bold markers, and bullet lines come in more than one
//! historical grammar. Everything here is best-effort: absent sections are
//! `None`, unmatched bullet lines are counted and skipped, and nothing ever
//! panics on malformed input.

mod blueprint;
mod section;
mod tech_stack;

pub use blueprint::{ApiEndpoint, Blueprint, BlueprintError, RoadmapPhase, UserStory};
pub use section::{
    SectionKind, extract_section, extract_section_titled, main_goal, mvp_features,
    tech_stack_section, user_flow,
};
pub use tech_stack::{BulletStyle, TechStackReport, parse_tech_stack, parse_tech_stack_report};
