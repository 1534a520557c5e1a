/// Keyword table used both to tag scraped sections and to score them per
/// routine component. Order matters: categories are emitted in this order.
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "supplements",
        &["supplement", "vitamin", "mineral", "omega", "nutrient"],
    ),
    (
        "exercise",
        &["exercise", "workout", "fitness", "training", "cardio", "strength"],
    ),
    ("diet", &["diet", "nutrition", "food", "meal", "eating"]),
    ("sleep", &["sleep", "circadian", "rest", "bed"]),
    ("testing", &["test", "measure", "track", "monitor", "biomarker"]),
    ("longevity", &["longevity", "lifespan", "aging", "age"]),
    ("brain", &["brain", "cognitive", "mental", "focus", "memory"]),
    ("hormones", &["hormone", "testosterone", "thyroid", "insulin"]),
];

/// Keywords for `category`, or an empty slice for categories outside the table.
pub fn keywords_for(category: &str) -> &'static [&'static str] {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Tags a section with every category that has at least one keyword present
/// (substring match) in its lowercased title and content.
pub fn categorize(title: &str, content: &str) -> Vec<String> {
    let text = format!("{title} {content}").to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| category.to_string())
        .collect()
}
