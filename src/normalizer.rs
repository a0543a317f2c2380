//! Field normalization rules for inbound leads.
//!
//! Everything here is pure: names are split, lead sources matched against the
//! labels Salesforce assignment rules know about, and project types derived
//! from free text through an ordered pattern table.

/// First name used when the submission carries no name at all.
pub const DEFAULT_FIRST_NAME: &str = "Unknown";
/// Last name used when the submission has a single name token or none.
pub const DEFAULT_LAST_NAME: &str = "Lead";
/// Lead source assigned when the submitted source is absent or unrecognized.
pub const FALLBACK_LEAD_SOURCE: &str = "Referral";

/// Lead source labels configured as picklist values in Salesforce.
pub const KNOWN_LEAD_SOURCES: &[&str] = &[
    "Google Ads Call",
    "Google Ads Form",
    "Google LSA",
    "Yelp",
    "Angi",
    "Thumbtack",
    "Houzz",
    "Nextdoor",
    "Facebook",
    "Referral",
];

/// One row of the project type table: any pattern matching yields `project`.
#[derive(Debug, Clone, Copy)]
pub struct ProjectRule {
    pub patterns: &'static [&'static str],
    pub project: &'static str,
}

/// Project type rules in priority order.
///
/// Multi-word phrases come before the single words they contain, and the
/// generic "remodel" is last. The first rule with a matching pattern wins.
pub const PROJECT_TYPE_RULES: &[ProjectRule] = &[
    ProjectRule {
        patterns: &["kitchen remodeling"],
        project: "Kitchen remodeling",
    },
    ProjectRule {
        patterns: &["bathroom remodeling"],
        project: "Bathroom remodeling",
    },
    ProjectRule {
        patterns: &["full home", "whole house"],
        project: "Full home remodeling",
    },
    ProjectRule {
        patterns: &["new room"],
        project: "New room",
    },
    ProjectRule {
        patterns: &["home interior", "interior design"],
        project: "Home interior",
    },
    ProjectRule {
        patterns: &["kitchen"],
        project: "Kitchen",
    },
    ProjectRule {
        patterns: &["bath"],
        project: "Bathroom",
    },
    ProjectRule {
        patterns: &["basement"],
        project: "Basement",
    },
    ProjectRule {
        patterns: &["exterior", "deck", "roof"],
        project: "Exterior",
    },
    ProjectRule {
        patterns: &["adu"],
        project: "ADU",
    },
    ProjectRule {
        patterns: &["addition"],
        project: "Addition",
    },
    ProjectRule {
        patterns: &["remodel"],
        project: "Remodeling",
    },
];

/// A full name split into Salesforce's first/last name fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

/// Splits a full name on whitespace.
///
/// The first token becomes the first name and the remaining tokens, joined by
/// single spaces, the last name. Missing parts fall back to
/// [`DEFAULT_FIRST_NAME`] / [`DEFAULT_LAST_NAME`].
pub fn split_full_name(full_name: &str) -> PersonName {
    let mut tokens = full_name.split_whitespace();
    let first = tokens.next().unwrap_or(DEFAULT_FIRST_NAME).to_string();
    let rest: Vec<&str> = tokens.collect();
    let last = if rest.is_empty() {
        DEFAULT_LAST_NAME.to_string()
    } else {
        rest.join(" ")
    };

    PersonName { first, last }
}

/// Outcome of matching a submitted lead source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceClassification {
    /// Canonical label sent to Salesforce.
    pub label: &'static str,
    /// True when a non-empty source was submitted but matched nothing.
    pub unrecognized: bool,
}

/// Matches `raw` case-insensitively against [`KNOWN_LEAD_SOURCES`].
///
/// Unrecognized sources are not an error, but they change how Salesforce
/// routes the lead, so they are logged at warn level.
pub fn classify_lead_source(raw: Option<&str>) -> SourceClassification {
    let submitted = raw.map(str::trim).filter(|s| !s.is_empty());

    let Some(submitted) = submitted else {
        return SourceClassification {
            label: FALLBACK_LEAD_SOURCE,
            unrecognized: false,
        };
    };

    if let Some(label) = KNOWN_LEAD_SOURCES
        .iter()
        .copied()
        .find(|label| label.eq_ignore_ascii_case(submitted))
    {
        return SourceClassification {
            label,
            unrecognized: false,
        };
    }

    tracing::warn!(
        "⚠️  Unrecognized lead source '{}', assigning '{}'",
        submitted,
        FALLBACK_LEAD_SOURCE
    );
    SourceClassification {
        label: FALLBACK_LEAD_SOURCE,
        unrecognized: true,
    }
}

/// Derives the project type from the explicit field and the scope text.
///
/// Returns `None` when no rule matches; callers must leave the Salesforce
/// field unset rather than substitute a placeholder.
pub fn classify_project_type(
    project_type: Option<&str>,
    scope: Option<&str>,
) -> Option<&'static str> {
    let combined = format!(
        "{} {}",
        project_type.unwrap_or_default(),
        scope.unwrap_or_default()
    )
    .to_lowercase();

    PROJECT_TYPE_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| combined.contains(p)))
        .map(|rule| rule.project)
}
