use std::collections::HashSet;

use crate::models::Epic;

/// Route slug and component name for one epic page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PagePlan {
    pub slug: String,
    pub component_name: String,
}

/// Lowercase ASCII slug with single hyphens between words.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// PascalCase identifier. Never empty and never starts with a digit.
pub fn pascal_case(text: &str) -> String {
    let mut out: String = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if out.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        out.insert_str(0, "Epic");
    }
    out
}

/// One page per epic, in order. Repeated titles get a numeric suffix.
pub(super) fn plan_pages(epics: &[Epic]) -> Vec<PagePlan> {
    let mut used = HashSet::new();
    epics
        .iter()
        .map(|epic| {
            let base = match slugify(&epic.title) {
                s if s.is_empty() => "epic".to_string(),
                s => s,
            };
            let mut slug = base.clone();
            let mut suffix = 2;
            while !used.insert(slug.clone()) {
                slug = format!("{base}-{suffix}");
                suffix += 1;
            }
            PagePlan {
                component_name: format!("{}Page", pascal_case(&slug)),
                slug,
            }
        })
        .collect()
}
