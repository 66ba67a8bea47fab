use std::collections::HashSet;

use super::record::ProductRecord;

/// Display order for the filtered list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Source row order, as loaded.
    #[default]
    SourceOrder,
    /// Ascending by product name, case-insensitive.
    Alphabetical,
    /// Descending by submission timestamp; missing timestamps sort last.
    Recent,
}

impl SortOrder {
    pub fn all() -> &'static [SortOrder] {
        &[
            SortOrder::SourceOrder,
            SortOrder::Alphabetical,
            SortOrder::Recent,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortOrder::SourceOrder => "Default",
            SortOrder::Alphabetical => "Alphabetical",
            SortOrder::Recent => "Most recent",
        }
    }
}

/// The user's current selection, owned by the UI layer and passed in by
/// value reference. An empty set or inactive toggle means "no restriction";
/// all active criteria combine with AND, while selections within one
/// multi-valued field match with OR.
#[derive(Clone, Debug, Default)]
pub struct FilterCriteria {
    pub categories: HashSet<String>,
    pub blockchains: HashSet<String>,
    pub flagship_only: bool,
    pub s_tier_only: bool,
    pub new_only: bool,
    pub sort: SortOrder,
}

impl FilterCriteria {
    pub fn is_unrestricted(&self) -> bool {
        self.categories.is_empty()
            && self.blockchains.is_empty()
            && !self.flagship_only
            && !self.s_tier_only
            && !self.new_only
    }
}

/// Pure filter + sort: returns a new list, leaves the input untouched.
/// Both sorts are stable, so equal keys keep their relative source order.
pub fn apply(products: &[ProductRecord], criteria: &FilterCriteria) -> Vec<ProductRecord> {
    let mut filtered: Vec<ProductRecord> = products
        .iter()
        .filter(|p| matches(p, criteria))
        .cloned()
        .collect();

    match criteria.sort {
        SortOrder::SourceOrder => {}
        SortOrder::Alphabetical => {
            filtered.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortOrder::Recent => {
            filtered.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        }
    }

    filtered
}

fn matches(product: &ProductRecord, criteria: &FilterCriteria) -> bool {
    let category_match = criteria.categories.is_empty()
        || product
            .categories
            .iter()
            .any(|c| criteria.categories.contains(c));
    let blockchain_match = criteria.blockchains.is_empty()
        || product
            .blockchains
            .iter()
            .any(|b| criteria.blockchains.contains(b));
    let flagship_match = !criteria.flagship_only || product.is_flagship;
    let s_tier_match = !criteria.s_tier_only || product.is_s_tier;
    let new_match = !criteria.new_only || product.is_new;

    category_match && blockchain_match && flagship_match && s_tier_match && new_match
}
