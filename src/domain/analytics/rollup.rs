//! Dimensional rollups with reconciled integer percentages.

use std::collections::HashMap;

use crate::domain::entities::{CategoryShare, DimensionalBreakdown};

/// Groups items by category and computes shares that sum to exactly 100.
///
/// `categories_of_interest` are always present in the result, with a zero
/// count if no item falls into them, and they come first in first-seen
/// order; other categories follow in the order they are first encountered.
pub fn rollup<T, F, S>(items: &[T], classify: F, categories_of_interest: &[&str]) -> DimensionalBreakdown
where
    F: Fn(&T) -> S,
    S: Into<String>,
{
    let counts = items.iter().map(|item| (classify(item).into(), 1u64));
    rollup_counts(counts, categories_of_interest)
}

/// Builds a breakdown from already counted `(category, count)` pairs.
///
/// Repeated categories are merged. This is the entry point for server-side
/// rollups whose raw categories normalize onto the same label.
pub fn rollup_counts<I>(counts: I, categories_of_interest: &[&str]) -> DimensionalBreakdown
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for category in categories_of_interest {
        if !index.contains_key(*category) {
            index.insert(category.to_string(), order.len());
            order.push((category.to_string(), 0));
        }
    }

    for (category, count) in counts {
        match index.get(&category) {
            Some(&i) => order[i].1 += count,
            None => {
                index.insert(category.clone(), order.len());
                order.push((category, count));
            }
        }
    }

    let total: u64 = order.iter().map(|(_, count)| count).sum();
    let counts: Vec<u64> = order.iter().map(|(_, count)| *count).collect();
    let percentages = reconciled_percentages(&counts, total);

    let mut items: Vec<CategoryShare> = order
        .into_iter()
        .zip(percentages)
        .map(|((category, count), percentage)| CategoryShare {
            category,
            count,
            percentage,
        })
        .collect();

    // Stable: ties keep first-seen order.
    items.sort_by(|a, b| b.count.cmp(&a.count));

    DimensionalBreakdown { total, items }
}

/// Rounded shares of `counts` that sum to exactly 100 when `total > 0`.
///
/// Each share is `round(count / total * 100)` with halves rounding up. The
/// signed rounding difference goes to the category with the largest count,
/// ties broken by position. If that would push a share below zero the rest
/// carries over to the next largest categories.
pub fn reconciled_percentages(counts: &[u64], total: u64) -> Vec<u32> {
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut percentages: Vec<i64> = counts
        .iter()
        .map(|&count| rounded_share(count, total) as i64)
        .collect();

    let mut diff = 100 - percentages.iter().sum::<i64>();
    if diff != 0 {
        let mut by_size: Vec<usize> = (0..counts.len()).collect();
        by_size.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

        for i in by_size {
            if diff == 0 {
                break;
            }
            let adjusted = (percentages[i] + diff).max(0);
            diff -= adjusted - percentages[i];
            percentages[i] = adjusted;
        }
    }

    percentages.into_iter().map(|p| p as u32).collect()
}

fn rounded_share(count: u64, total: u64) -> u64 {
    let count = count as u128;
    let total = total as u128;
    ((count * 200 + total) / (2 * total)) as u64
}

/// Largest `n` categories, optionally leaving one label out.
///
/// Shares are taken as-is from the breakdown, so an excluded category still
/// counts toward the denominator.
pub fn top_categories(
    breakdown: &DimensionalBreakdown,
    n: usize,
    exclude: Option<&str>,
) -> Vec<CategoryShare> {
    breakdown
        .items
        .iter()
        .filter(|item| item.count > 0)
        .filter(|item| exclude != Some(item.category.as_str()))
        .take(n)
        .cloned()
        .collect()
}
