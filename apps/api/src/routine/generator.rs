//! Routine generation: combines the template with the matched sections.
//!
//! Pure: no I/O. Persisting the result is the caller's job.

use crate::matching::categories::match_categories;
use crate::matching::RoutineMatch;
use crate::models::routine::{Component, EmbeddedSection, ProtocolLinks, RoutineDraft};
use crate::models::user::PreferenceTags;
use crate::routine::template::RoutineTemplate;

/// Reference for `component`: the matched section's URL, else the default anchor.
fn link_for(matched: &RoutineMatch, component: Component, protocol_url: &str) -> String {
    matched
        .get(component)
        .map(|m| m.section.url.clone())
        .unwrap_or_else(|| component.default_anchor(protocol_url))
}

pub fn generate_routine(
    tags: PreferenceTags<'_>,
    template: &RoutineTemplate,
    matched: &RoutineMatch,
    protocol_url: &str,
) -> RoutineDraft {
    let protocol_links = ProtocolLinks {
        supplements: link_for(matched, Component::Supplements, protocol_url),
        exercise: link_for(matched, Component::Exercise, protocol_url),
        diet: link_for(matched, Component::Diet, protocol_url),
        sleep: link_for(matched, Component::Sleep, protocol_url),
        testing: link_for(matched, Component::Testing, protocol_url),
    };

    let focus_categories: Vec<String> = match_categories(tags, protocol_url)
        .into_iter()
        .map(|link| link.category)
        .collect();

    let mut supplements = template.supplements.clone();
    for category in &focus_categories {
        for addon in template.supplement_addons.get(category).into_iter().flatten() {
            if !supplements.iter().any(|s| s.name == addon.name) {
                supplements.push(addon.clone());
            }
        }
    }
    for supplement in &mut supplements {
        supplement.reference = Some(protocol_links.supplements.clone());
    }

    let mut diet = template.diet.clone();
    diet.reference = Some(protocol_links.diet.clone());

    let mut exercise = template.exercise.clone();
    exercise.reference = Some(protocol_links.exercise.clone());

    let mut sleep_schedule = template.sleep_schedule.clone();
    sleep_schedule.reference = Some(protocol_links.sleep.clone());

    let mut metrics = template.metrics.clone();
    metrics.reference = Some(protocol_links.testing.clone());

    let embedded_sections = Component::ALL
        .iter()
        .filter_map(|component| matched.get(*component))
        .map(|m| EmbeddedSection {
            title: m.section.title.clone(),
            content: m.section.content.clone(),
            url: m.section.url.clone(),
        })
        .collect();

    RoutineDraft {
        supplements,
        diet,
        exercise,
        sleep_schedule,
        metrics,
        protocol_links,
        embedded_sections,
        focus_categories,
    }
}
