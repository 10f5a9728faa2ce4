use super::domain::Category;

/// Category a title falls back to when no keyword group matches.
///
/// Carried over from the original scoring behavior for compatibility; an
/// unmatched title silently lands in Exterior instead of an "unclassified"
/// bucket. Flagged for product review in DESIGN.md.
pub(crate) const DEFAULT_CATEGORY: Category = Category::Exterior;

/// Ordered keyword groups; the first group with a substring match wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Roof, &["roof"]),
    (Category::Foundation, &["foundation", "basement", "crawlspace"]),
    (Category::Hvac, &["hvac", "cooling", "heating"]),
    (Category::Plumbing, &["plumb", "water heater", "septic"]),
    (Category::Electrical, &["electrical", "wiring", "breaker"]),
    (Category::Exterior, &["exterior", "siding", "stucco", "brick"]),
    (Category::Interior, &["interior", "flooring", "walls", "ceiling"]),
    (
        Category::Appliances,
        &["appliance", "oven", "range", "dishwasher"],
    ),
];

/// Assign an issue title to a home-system category. Pure and total: every
/// title yields a category.
pub fn classify_title(title: &str) -> Category {
    let lowered = title.to_lowercase();

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return *category;
        }
    }

    DEFAULT_CATEGORY
}
