use tracing::debug;

use crate::common::collections::{BTreeSet, HashSet};
use crate::model::layout::referenced_titles;
use crate::model::{Entry, IdentityMap, Layout};

/// Most items the Dock shows on one page.
pub const MISSING_PAGE_CAPACITY: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub layout: Layout,
    /// Titles that were appended because the layout did not mention them.
    pub missing: BTreeSet<String>,
}

/// Known titles the layout never mentions.
pub fn missing_titles(layout: &Layout, map: &IdentityMap) -> BTreeSet<String> {
    let referenced: HashSet<&str> = referenced_titles(layout).collect();
    map.titles()
        .filter(|title| !referenced.contains(title))
        .map(str::to_owned)
        .collect()
}

/// Appends every missing title as trailing flat pages of at most
/// [`MISSING_PAGE_CAPACITY`] entries, in lexicographic order.
pub fn normalize(layout: &Layout, map: &IdentityMap) -> Normalized {
    let missing = missing_titles(layout, map);
    let mut completed = layout.clone();

    let titles: Vec<&String> = missing.iter().collect();
    for batch in titles.chunks(MISSING_PAGE_CAPACITY) {
        completed.push(batch.iter().map(|&title| Entry::Title(title.clone())).collect());
    }
    if !missing.is_empty() {
        debug!(
            missing = missing.len(),
            pages = completed.len() - layout.len(),
            "appended pages for missing items"
        );
    }

    Normalized { layout: completed, missing }
}
