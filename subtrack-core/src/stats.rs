//! Derived spending figures
//!
//! Pure functions over a slice of subscriptions. Every figure is in monthly
//! equivalents: yearly prices divided by 12, quarterly prices by 3.

use crate::{Amount, Category, Subscription};
use serde::Serialize;

/// One slice of the category chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub category: Category,
    pub monthly: Amount,
    /// Whole percent of the monthly total, rounded half away from zero.
    pub percentage: u32,
    pub color: &'static str,
}

/// Sum of monthly equivalents. Zero for an empty slice.
pub fn total_monthly(subscriptions: &[Subscription]) -> Amount {
    subscriptions.iter().map(Subscription::monthly_price).sum()
}

/// Monthly spend per category, in order of first appearance.
///
/// Returns an empty list when there is nothing to share out (no
/// subscriptions, or a zero total), so no percentage is ever computed
/// against zero.
pub fn breakdown_by_category(subscriptions: &[Subscription]) -> Vec<CategoryShare> {
    let total = total_monthly(subscriptions);
    if total.is_zero() {
        return Vec::new();
    }

    let mut groups: Vec<(Category, Amount)> = Vec::new();
    for sub in subscriptions {
        let monthly = sub.monthly_price();
        match groups.iter_mut().find(|(category, _)| *category == sub.category) {
            Some((_, sum)) => *sum = sum.saturating_add(&monthly),
            None => groups.push((sub.category.clone(), monthly)),
        }
    }

    groups
        .into_iter()
        .map(|(category, monthly)| CategoryShare {
            name: category.as_str().to_string(),
            percentage: monthly.percent_of(&total).unwrap_or(0),
            color: category.color(),
            category,
            monthly,
        })
        .collect()
}

/// The category with the largest monthly spend.
///
/// Ties go to the category seen first. `None` when `shares` is empty.
pub fn most_expensive(shares: &[CategoryShare]) -> Option<&CategoryShare> {
    shares
        .iter()
        .reduce(|best, share| if share.monthly > best.monthly { share } else { best })
}
