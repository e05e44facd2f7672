use bx_core::Section;

/// The named sections a generated blueprint is expected to contain.
///
/// Each kind carries its accepted title synonyms (the prompt template has
/// shipped in English and Indonesian) as plain data; matching is structural,
/// so adding a localization is a data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    MainGoal,
    UserFlow,
    MvpFeatures,
    TechStack,
}

impl SectionKind {
    pub const ALL: [Self; 4] = [
        Self::MainGoal,
        Self::UserFlow,
        Self::MvpFeatures,
        Self::TechStack,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainGoal => "main-goal",
            Self::UserFlow => "user-flow",
            Self::MvpFeatures => "mvp-features",
            Self::TechStack => "tech-stack",
        }
    }

    /// Accepted title synonyms, matched case-insensitively as prefixes of the
    /// normalized heading text.
    #[must_use]
    pub const fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::MainGoal => &["Main Application Goal", "Tujuan Utama Aplikasi"],
            Self::UserFlow => &["How It Works (User Flow)", "Cara Kerja (Alur Pengguna)"],
            Self::MvpFeatures => &[
                "MVP Features (Minimum Viable Product)",
                "MVP Features",
                "Fitur-Fitur MVP",
            ],
            Self::TechStack => &["Recommended Tech Stack", "Rekomendasi Tech Stack"],
        }
    }
}

/// Extract the section named by `kind` from a markdown document.
///
/// Returns `None` when no heading matches; absence is not an error and there
/// is deliberately no sentinel string that could leak into rendered content.
#[must_use]
pub fn extract_section(document: &str, kind: SectionKind) -> Option<Section> {
    extract_section_titled(document, kind.synonyms())
}

/// Extract the first section whose normalized heading title starts with any
/// of `titles`, case-insensitively.
///
/// The section body runs from the line after the heading to the next heading
/// of the same or smaller depth, or end of document. Deeper sub-headings stay
/// inside the body. The heading line itself is removed and the body trimmed.
#[must_use]
pub fn extract_section_titled(document: &str, titles: &[&str]) -> Option<Section> {
    let lines: Vec<&str> = document.lines().collect();

    for (index, line) in lines.iter().enumerate() {
        let Some((depth, title)) = heading_title(line) else {
            continue;
        };
        if !matches_any(&title, titles) {
            continue;
        }

        let end = lines
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, later)| matches!(heading_title(later), Some((d, _)) if d <= depth))
            .map_or(lines.len(), |(j, _)| j);

        let body = lines[index + 1..end].join("\n").trim().to_string();
        return Some(Section { title, body });
    }

    None
}

/// Body of the "Main Application Goal" section, if present.
#[must_use]
pub fn main_goal(document: &str) -> Option<String> {
    extract_section(document, SectionKind::MainGoal).map(|s| s.body)
}

/// Body of the "How It Works (User Flow)" section, if present.
#[must_use]
pub fn user_flow(document: &str) -> Option<String> {
    extract_section(document, SectionKind::UserFlow).map(|s| s.body)
}

/// Body of the "MVP Features" section, if present.
#[must_use]
pub fn mvp_features(document: &str) -> Option<String> {
    extract_section(document, SectionKind::MvpFeatures).map(|s| s.body)
}

/// Raw body of the "Recommended Tech Stack" section, if present.
///
/// For structured records use [`crate::parse_tech_stack`]; this wrapper is
/// for callers that want the unparsed text.
#[must_use]
pub fn tech_stack_section(document: &str) -> Option<String> {
    extract_section(document, SectionKind::TechStack).map(|s| s.body)
}

fn matches_any(title: &str, candidates: &[&str]) -> bool {
    let lowered = title.to_lowercase();
    candidates
        .iter()
        .any(|candidate| lowered.starts_with(&candidate.to_lowercase()))
}

/// Classify a line as a heading and normalize its title.
///
/// A heading starts with one or more `#` markers. The title may be wrapped in
/// bold markers and prefixed by an ordinal (`1.`), in either order; both are
/// stripped before matching.
fn heading_title(line: &str) -> Option<(usize, String)> {
    let trimmed = line.trim_start();
    let depth = trimmed.bytes().take_while(|b| *b == b'#').count();
    if depth == 0 {
        return None;
    }

    let mut title = trimmed[depth..].trim();
    if let Some(rest) = title.strip_prefix("**") {
        title = rest.trim_start();
    }
    title = strip_ordinal(title);
    if let Some(rest) = title.strip_prefix("**") {
        title = rest.trim_start();
    }
    if let Some(rest) = title.strip_suffix("**") {
        title = rest.trim_end();
    }

    Some((depth, title.to_string()))
}

/// Strip a leading `<digits>.` ordinal, leaving the input untouched when the
/// digits are not followed by a dot.
fn strip_ordinal(text: &str) -> &str {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return text;
    }
    match text[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_numbered_section() {
        let doc = "## 1. Main Application Goal\nBuilds X.\n\n## 2. How It Works\n...";
        let section = extract_section(doc, SectionKind::MainGoal).expect("section present");
        assert_eq!(section.title, "Main Application Goal");
        assert_eq!(section.body, "Builds X.");
    }

    #[test]
    fn missing_section_is_none() {
        let doc = "## Something Else\nbody text";
        assert_eq!(extract_section(doc, SectionKind::MainGoal), None);
        // Deterministic: same input, same answer.
        assert_eq!(extract_section(doc, SectionKind::MainGoal), None);
    }

    #[test]
    fn handles_bold_and_ordinal_decoration() {
        let doc = "## **2. How It Works (User Flow)**\nStep one.\nStep two.\n## 3. Next";
        let body = user_flow(doc).expect("user flow present");
        assert_eq!(body, "Step one.\nStep two.");
    }

    #[test]
    fn handles_ordinal_before_bold() {
        let doc = "## 1. **Main Application Goal**\nGoal body.";
        assert_eq!(main_goal(doc).as_deref(), Some("Goal body."));
    }

    #[test]
    fn indonesian_synonym_matches() {
        let doc = "## Tujuan Utama Aplikasi\nMembangun X.";
        assert_eq!(main_goal(doc).as_deref(), Some("Membangun X."));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let doc = "## MAIN APPLICATION GOAL\nShouty body.";
        assert_eq!(main_goal(doc).as_deref(), Some("Shouty body."));
    }

    #[test]
    fn deeper_subheadings_stay_inside_the_section() {
        let doc = "## MVP Features\n### Must have\n- a\n### Nice to have\n- b\n## Other";
        let body = mvp_features(doc).expect("mvp features present");
        assert_eq!(body, "### Must have\n- a\n### Nice to have\n- b");
    }

    #[test]
    fn section_at_end_of_document_runs_to_eof() {
        let doc = "## Other\nx\n## Main Application Goal\nlast body\n";
        assert_eq!(main_goal(doc).as_deref(), Some("last body"));
    }

    #[test]
    fn heading_with_empty_body_yields_empty_string() {
        let doc = "## Main Application Goal\n## Next";
        assert_eq!(main_goal(doc).as_deref(), Some(""));
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert_eq!(extract_section("", SectionKind::TechStack), None);
    }

    #[test]
    fn prefix_match_tolerates_trailing_title_text() {
        // "MVP Features" is a synonym prefix of the longer decorated title.
        let doc = "## MVP Features - phase 1\n- feature";
        assert_eq!(mvp_features(doc).as_deref(), Some("- feature"));
    }

    #[test]
    fn tech_stack_section_returns_raw_body() {
        let doc = "\
## Recommended Tech Stack
- **Frontend:** Next.js - (Fast)
Some prose line.

## Next
";
        let body = tech_stack_section(doc).expect("tech stack present");
        assert_eq!(body, "- **Frontend:** Next.js - (Fast)\nSome prose line.");
        assert_eq!(tech_stack_section("## Unrelated\nx"), None);
    }

    #[test]
    fn heading_without_space_after_markers_still_matches() {
        let doc = "##Main Application Goal\nbody";
        assert_eq!(main_goal(doc).as_deref(), Some("body"));
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(64))]

        #[test]
        fn prop_extraction_is_total_and_deterministic(doc in ".{0,256}") {
            let first = extract_section(&doc, SectionKind::MainGoal);
            let second = extract_section(&doc, SectionKind::MainGoal);
            proptest::prop_assert_eq!(first, second);
        }
    }
}
