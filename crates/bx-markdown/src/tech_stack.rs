use bx_core::TechStackItem;
use serde::Serialize;
use tracing::debug;

use crate::section::{SectionKind, extract_section};

/// Bullet-line grammar variant for the tech-stack section.
///
/// Two grammars have shipped in prompt templates over time; the parser is one
/// implementation parameterized by variant rather than two diverging copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletStyle {
    /// `- **Category:** Tech - (reason)` — what the current prompt template
    /// produces.
    #[default]
    ParenReason,
    /// `- **Category:** [Tech] - [reason]` — legacy bracketed form.
    BracketedPair,
}

/// Parse outcome for the tech-stack section, including how many non-blank
/// lines failed the bullet grammar. The skip count exists for observability
/// and tests; callers that only want items use [`parse_tech_stack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct TechStackReport {
    pub items: Vec<TechStackItem>,
    pub skipped_lines: usize,
}

/// Parse the recommended-tech-stack section with the default bullet grammar.
///
/// An absent section yields an empty vec, not an error. Item order follows
/// source order; nothing is deduplicated.
#[must_use]
pub fn parse_tech_stack(document: &str) -> Vec<TechStackItem> {
    parse_tech_stack_report(document, BulletStyle::default()).items
}

/// Parse the tech-stack section with an explicit bullet grammar, reporting
/// skipped lines.
#[must_use]
pub fn parse_tech_stack_report(document: &str, style: BulletStyle) -> TechStackReport {
    let Some(section) = extract_section(document, SectionKind::TechStack) else {
        return TechStackReport::default();
    };

    let mut report = TechStackReport::default();
    for line in section.body.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        match parse_bullet(line, style) {
            Some(item) => report.items.push(item),
            None => report.skipped_lines += 1,
        }
    }

    if report.skipped_lines > 0 {
        debug!(
            skipped = report.skipped_lines,
            parsed = report.items.len(),
            "tech-stack section contained lines outside the bullet grammar"
        );
    }
    report
}

fn parse_bullet(line: &str, style: BulletStyle) -> Option<TechStackItem> {
    let rest = line.strip_prefix('-')?.trim_start();
    let rest = rest.strip_prefix("**")?;
    let (name, rest) = rest.split_once(":**")?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let (tech, reason) = match style {
        BulletStyle::ParenReason => split_paren_reason(rest)?,
        BulletStyle::BracketedPair => split_bracketed_pair(rest)?,
    };
    if tech.is_empty() {
        return None;
    }

    Some(TechStackItem {
        name: name.to_string(),
        tech: tech.to_string(),
        reason: reason.to_string(),
    })
}

/// `Tech - (reason)` — tech runs up to the dash that introduces the
/// parenthesized reason; a missing closing parenthesis is tolerated.
fn split_paren_reason(rest: &str) -> Option<(&str, &str)> {
    let open = rest.find('(')?;
    let tech = rest[..open].trim_end().strip_suffix('-')?.trim();
    let reason = rest[open + 1..].trim();
    let reason = reason.strip_suffix(')').unwrap_or(reason).trim_end();
    Some((tech, reason))
}

/// `[Tech] - [reason]`.
fn split_bracketed_pair(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim_start().strip_prefix('[')?;
    let (tech, rest) = rest.split_once(']')?;
    let rest = rest.trim_start().strip_prefix('-')?.trim_start();
    let rest = rest.strip_prefix('[')?;
    let reason = match rest.split_once(']') {
        Some((inner, _)) => inner,
        None => rest,
    };
    Some((tech.trim(), reason.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# Blueprint

## 4. Recommended Tech Stack
- **Frontend:** Next.js - (Fast, type-safe)
- **Backend:** Node.js with Express.js - (Scalable and efficient)
- **Database:** PostgreSQL - (Reliable relational store)

## 5. Next Section
ignored
";

    #[test]
    fn parses_current_prompt_template_bullets() {
        let items = parse_tech_stack(DOC);
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0],
            bx_core::TechStackItem {
                name: "Frontend".into(),
                tech: "Next.js".into(),
                reason: "Fast, type-safe".into(),
            }
        );
        assert_eq!(items[1].tech, "Node.js with Express.js");
    }

    #[test]
    fn order_follows_source_order() {
        let items = parse_tech_stack(DOC);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Frontend", "Backend", "Database"]);
    }

    #[test]
    fn absent_section_yields_empty_vec() {
        assert!(parse_tech_stack("## Unrelated\nbody").is_empty());
        assert!(parse_tech_stack("").is_empty());
    }

    #[test]
    fn non_matching_lines_are_skipped_and_counted() {
        let doc = "\
## Recommended Tech Stack
Some prose the model added.
- **Frontend:** Next.js - (Fast)
- just a bare bullet
";
        let report = parse_tech_stack_report(doc, BulletStyle::ParenReason);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.skipped_lines, 2);
    }

    #[test]
    fn missing_closing_paren_is_tolerated() {
        let doc = "## Recommended Tech Stack\n- **Auth:** Supabase - (Managed auth";
        let items = parse_tech_stack(doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].reason, "Managed auth");
    }

    #[test]
    fn bracketed_legacy_style_parses() {
        let doc = "\
## Rekomendasi Tech Stack
- **Frontend:** [Next.js + TypeScript] - [Cepat dan aman]
";
        let report = parse_tech_stack_report(doc, BulletStyle::BracketedPair);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].tech, "Next.js + TypeScript");
        assert_eq!(report.items[0].reason, "Cepat dan aman");
        assert_eq!(report.skipped_lines, 0);
    }

    #[test]
    fn styles_do_not_cross_match() {
        let doc = "## Recommended Tech Stack\n- **Frontend:** Next.js - (Fast)";
        let report = parse_tech_stack_report(doc, BulletStyle::BracketedPair);
        assert!(report.items.is_empty());
        assert_eq!(report.skipped_lines, 1);
    }

    #[test]
    fn duplicate_categories_are_kept() {
        let doc = "\
## Recommended Tech Stack
- **Infra:** Vercel - (Zero-config deploys)
- **Infra:** Vercel - (Zero-config deploys)
";
        assert_eq!(parse_tech_stack(doc).len(), 2);
    }
}
