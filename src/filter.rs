//! Category filtering over a loaded catalog.
//!
//! Both functions are pure: the visible set depends only on the catalog and
//! the selected id, so callers may recompute it whenever they like.

use crate::catalog::{ALL_CATEGORY, Catalog, Category, GalleryItem};

/// Items visible under `selected`, in catalog order.
///
/// [`ALL_CATEGORY`] selects everything. Any other id keeps only items whose
/// category matches exactly; an unmatched id yields an empty set.
pub fn filter<'a>(catalog: &'a Catalog, selected: &str) -> Vec<&'a GalleryItem> {
    if selected == ALL_CATEGORY {
        return catalog.items.iter().collect();
    }
    catalog
        .items
        .iter()
        .filter(|item| item.category == selected)
        .collect()
}

/// Filter tabs to offer, with the "all" sentinel first.
///
/// A catalog may declare the sentinel itself (its name is then used as-is);
/// otherwise one is synthesised with `all_label`. A repeated category id
/// yields one tab, named by its first declaration.
pub fn filter_tabs(catalog: &Catalog, all_label: &str) -> Vec<Category> {
    let all = catalog
        .categories
        .iter()
        .find(|c| c.is_all())
        .cloned()
        .unwrap_or_else(|| Category {
            id: ALL_CATEGORY.to_string(),
            name: all_label.to_string(),
        });

    let mut tabs = vec![all];
    for category in &catalog.categories {
        if !tabs.iter().any(|t| t.id == category.id) {
            tabs.push(category.clone());
        }
    }
    tabs
}
