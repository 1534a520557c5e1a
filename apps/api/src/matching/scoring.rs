use crate::corpus::categorize::keywords_for;
use crate::corpus::ReferenceCorpus;
use crate::matching::{RoutineMatch, SectionMatch, SectionMatcher};
use crate::models::routine::Component;
use crate::models::section::ReferenceSection;

/// Weight of a direct category tag relative to a single keyword hit.
pub const CATEGORY_MATCH_WEIGHT: u32 = 5;

/// Default matcher: category tag plus keyword frequency in section content.
///
/// Algorithm, per component:
/// 1. Candidates: sections tagged with the component's category, or whose
///    content contains any of the component's keywords.
/// 2. score = 5 × (tagged) + Σ occurrences of each keyword in the content
///    (case-insensitive, non-overlapping).
/// 3. Highest score wins; ties keep corpus order.
pub struct KeywordSectionMatcher;

impl SectionMatcher for KeywordSectionMatcher {
    fn match_components(&self, corpus: &ReferenceCorpus) -> RoutineMatch {
        let mut result = RoutineMatch::default();
        for component in Component::ALL {
            if let Some(best) = rank_sections(corpus, component).into_iter().next() {
                result.insert(component, best);
            }
        }
        result
    }
}

/// Scores one section for one component, or `None` if it is not a candidate.
pub fn score_section(section: &ReferenceSection, component: Component) -> Option<u32> {
    let keywords = keywords_for(component.as_str());
    let content = section.content.to_lowercase();

    let category_match = section.has_category(component.as_str());
    let keyword_hits: u32 = keywords
        .iter()
        .map(|kw| content.matches(kw).count() as u32)
        .sum();

    if !category_match && keyword_hits == 0 {
        return None;
    }

    let category_score = if category_match {
        CATEGORY_MATCH_WEIGHT
    } else {
        0
    };
    Some(category_score + keyword_hits)
}

/// All candidate sections for `component`, best first. The sort is stable,
/// so equal scores keep their corpus order.
pub fn rank_sections(corpus: &ReferenceCorpus, component: Component) -> Vec<SectionMatch> {
    let mut ranked: Vec<SectionMatch> = corpus
        .sections()
        .iter()
        .filter_map(|section| {
            score_section(section, component).map(|score| SectionMatch {
                section: section.clone(),
                score,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}
