use serde::Serialize;

use crate::models::user::PreferenceTags;

const IMPROVEMENT_AREA_CATEGORIES: &[(&str, &[&str])] = &[
    ("biological-age", &["testing", "supplements"]),
    ("brain", &["brain", "supplements"]),
    ("sleep", &["sleep"]),
    ("fitness", &["exercise"]),
    ("longevity", &["longevity", "supplements", "diet"]),
    ("hormones", &["hormones", "testing"]),
];

const EQUIPMENT_CATEGORIES: &[(&str, &[&str])] = &[
    ("red-light", &["light-therapy"]),
    ("cgm", &["glucose", "testing"]),
    ("oura", &["sleep", "tracking"]),
    ("hyperbaric", &["oxygen-therapy"]),
    ("infrared-sauna", &["sauna", "heat-therapy"]),
    ("cold-plunge", &["cold-therapy"]),
    ("peptide-injections", &["peptides"]),
    ("blood-testing", &["testing", "biomarkers"]),
    ("dexa", &["body-composition", "testing"]),
];

const CURRENT_HEALTH_CATEGORIES: &[(&str, &[&str])] = &[
    ("supplements", &["supplements"]),
    ("tracking-sleep", &["sleep"]),
    ("tracking-glucose", &["glucose", "testing"]),
    ("regular-exercise", &["exercise"]),
    ("strict-diet", &["diet"]),
    ("blood-tests", &["testing"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLink {
    pub category: String,
    pub url: String,
}

fn lookup(
    table: &'static [(&'static str, &'static [&'static str])],
    tag: &str,
) -> &'static [&'static str] {
    table
        .iter()
        .find(|(key, _)| *key == tag)
        .map(|(_, categories)| *categories)
        .unwrap_or(&[])
}

/// Maps preference tags to protocol categories through the static tables.
///
/// Tags are visited improvement areas first, then equipment, then current
/// health; each category appears once at its first occurrence. Unknown tags
/// contribute nothing.
pub fn match_categories(tags: PreferenceTags<'_>, protocol_url: &str) -> Vec<CategoryLink> {
    let base = protocol_url.trim_end_matches('/');
    let sources = [
        (IMPROVEMENT_AREA_CATEGORIES, tags.improvement_areas),
        (EQUIPMENT_CATEGORIES, tags.equipment),
        (CURRENT_HEALTH_CATEGORIES, tags.current_health),
    ];

    let mut matches: Vec<CategoryLink> = Vec::new();
    for (table, values) in sources {
        for tag in values {
            for category in lookup(table, tag) {
                if matches.iter().any(|m| m.category == *category) {
                    continue;
                }
                matches.push(CategoryLink {
                    category: category.to_string(),
                    url: format!("{base}#{category}"),
                });
            }
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://protocol.example.com";

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn categories(links: &[CategoryLink]) -> Vec<&str> {
        links.iter().map(|l| l.category.as_str()).collect()
    }

    #[test]
    fn test_union_in_first_seen_order() {
        let areas = strings(&["longevity", "brain"]);
        let equipment = strings(&["oura"]);
        let health = strings(&["blood-tests"]);
        let tags = PreferenceTags {
            improvement_areas: &areas,
            equipment: &equipment,
            current_health: &health,
        };

        let links = match_categories(tags, URL);

        assert_eq!(
            categories(&links),
            vec!["longevity", "supplements", "diet", "brain", "sleep", "tracking", "testing"]
        );
    }

    #[test]
    fn test_links_point_at_category_anchor() {
        let areas = strings(&["sleep"]);
        let tags = PreferenceTags {
            improvement_areas: &areas,
            ..PreferenceTags::EMPTY
        };
        let links = match_categories(tags, "https://protocol.example.com/");
        assert_eq!(links[0].url, "https://protocol.example.com#sleep");
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let areas = strings(&["telekinesis"]);
        let equipment = strings(&["hoverboard", "cgm"]);
        let tags = PreferenceTags {
            improvement_areas: &areas,
            equipment: &equipment,
            current_health: &[],
        };
        assert_eq!(categories(&match_categories(tags, URL)), vec!["glucose", "testing"]);
    }

    #[test]
    fn test_tag_lists_do_not_cross_tables() {
        // "sleep" is an improvement area, not a current-health practice
        let health = strings(&["sleep"]);
        let tags = PreferenceTags {
            current_health: &health,
            ..PreferenceTags::EMPTY
        };
        assert!(match_categories(tags, URL).is_empty());
    }
}
