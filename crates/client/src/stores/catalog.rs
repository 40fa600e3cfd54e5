//! Pure queries over a catalog snapshot.

use std::collections::HashMap;

use wonderland_core::{Category, ProductId};

use crate::api::ProductRecord;

/// Records whose category is exactly `category`.
#[must_use]
pub fn filter_by_category(records: &[ProductRecord], category: Category) -> Vec<&ProductRecord> {
    records.iter().filter(|r| r.category == category).collect()
}

/// Case-insensitive substring match over name, brand and description.
/// A blank query matches everything.
#[must_use]
pub fn search<'a>(records: &'a [ProductRecord], query: &str) -> Vec<&'a ProductRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.brand.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Records with fewer than `threshold` units left.
#[must_use]
pub fn low_stock(records: &[ProductRecord], threshold: u32) -> Vec<&ProductRecord> {
    records
        .iter()
        .filter(|r| r.available_quantity < threshold)
        .collect()
}

/// Drop repeated ids. The last occurrence wins, in the slot of the first.
#[must_use]
pub fn dedupe(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut slots: HashMap<ProductId, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<ProductRecord> = Vec::with_capacity(records.len());
    for record in records {
        match slots.get(&record.id).and_then(|&i| unique.get_mut(i)) {
            Some(slot) => *slot = record,
            None => {
                slots.insert(record.id.clone(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}
