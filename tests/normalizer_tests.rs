/// Unit tests for lead normalization
/// Tests name splitting, lead source matching and project type priority
use salesforce_lead_router::normalizer::{
    classify_lead_source, classify_project_type, split_full_name, KNOWN_LEAD_SOURCES,
    PROJECT_TYPE_RULES,
};

#[cfg(test)]
mod name_split_tests {
    use super::*;

    #[test]
    fn test_multi_token_names() {
        let cases = [
            ("Jane Doe", "Jane", "Doe"),
            ("José María García López", "José", "María García López"),
            ("  Ana\tde   la Cruz  ", "Ana", "de la Cruz"),
            ("O'Brien  Jr.", "O'Brien", "Jr."),
        ];

        for (input, first, last) in cases {
            let name = split_full_name(input);
            assert_eq!(name.first, first, "first name of {:?}", input);
            assert_eq!(name.last, last, "last name of {:?}", input);
        }
    }

    #[test]
    fn test_blank_names_use_defaults() {
        for input in ["", " ", "\t\n "] {
            let name = split_full_name(input);
            assert_eq!(name.first, "Unknown");
            assert_eq!(name.last, "Lead");
        }
    }
}

#[cfg(test)]
mod lead_source_tests {
    use super::*;

    #[test]
    fn test_every_known_source_round_trips() {
        for label in KNOWN_LEAD_SOURCES {
            let upper = classify_lead_source(Some(label.to_uppercase().as_str()));
            assert_eq!(upper.label, *label);
            assert!(!upper.unrecognized);

            let padded_label = format!("  {}  ", label.to_lowercase());
            let padded = classify_lead_source(Some(padded_label.as_str()));
            assert_eq!(padded.label, *label);
        }
    }

    #[test]
    fn test_unknown_sources_fall_back_to_referral() {
        for input in ["Google", "yelp.com", "Angie's List", "word of mouth"] {
            let classified = classify_lead_source(Some(input));
            assert_eq!(classified.label, "Referral", "source {:?}", input);
            assert!(classified.unrecognized, "source {:?}", input);
        }
    }

    #[test]
    fn test_referral_is_recognized() {
        assert!(!classify_lead_source(Some("referral")).unrecognized);
    }
}

#[cfg(test)]
mod project_type_tests {
    use super::*;

    #[test]
    fn test_priority_cases() {
        let cases = [
            (None, Some("kitchen remodeling"), Some("Kitchen remodeling")),
            (Some("Kitchen"), Some("remodeling"), Some("Kitchen remodeling")),
            (None, Some("bathroom remodeling needed"), Some("Bathroom remodeling")),
            (None, Some("Whole house refresh incl. kitchen"), Some("Full home remodeling")),
            (Some("Full Home"), None, Some("Full home remodeling")),
            (None, Some("add a new room over the garage"), Some("New room")),
            (None, Some("interior design for the kitchen"), Some("Home interior")),
            (None, Some("home interior"), Some("Home interior")),
            (None, Some("new kitchen cabinets"), Some("Kitchen")),
            (None, Some("master bath tile"), Some("Bathroom")),
            (None, Some("Finish the BASEMENT"), Some("Basement")),
            (None, Some("replace roof shingles"), Some("Exterior")),
            (Some("deck"), None, Some("Exterior")),
            (Some("ADU"), Some("backyard unit"), Some("ADU")),
            (None, Some("second story addition"), Some("Addition")),
            (None, Some("remodel"), Some("Remodeling")),
            (None, Some("general remodeling work"), Some("Remodeling")),
        ];

        for (project_type, scope, expected) in cases {
            assert_eq!(
                classify_project_type(project_type, scope),
                expected,
                "project_type={:?} scope={:?}",
                project_type,
                scope
            );
        }
    }

    #[test]
    fn test_no_match_leaves_project_unset() {
        assert_eq!(classify_project_type(None, None), None);
        assert_eq!(classify_project_type(Some(""), Some("")), None);
        assert_eq!(classify_project_type(Some("Fencing"), Some("new gate")), None);
    }

    #[test]
    fn test_phrases_precede_their_words() {
        let position = |project: &str| {
            PROJECT_TYPE_RULES
                .iter()
                .position(|rule| rule.project == project)
                .unwrap()
        };

        assert!(position("Kitchen remodeling") < position("Kitchen"));
        assert!(position("Bathroom remodeling") < position("Bathroom"));
        assert_eq!(position("Remodeling"), PROJECT_TYPE_RULES.len() - 1);
    }
}
