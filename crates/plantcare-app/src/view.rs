// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Display projections over a list of plant records.
//!
//! Every function here is side-effect free and returns a new list; callers
//! keep ownership of the authoritative records.

use std::cmp::Reverse;

use crate::{ALL_CATEGORIES, CategoryFilter, PlantRecord, SortKey};

/// `"all"` followed by each distinct category in first-seen order. A record
/// stored under the literal category `"all"` is only reachable through the
/// `"all"` selection, so it adds no entry of its own.
pub fn list_categories(records: &[PlantRecord]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_owned()];
    for record in records {
        if !categories.contains(&record.category) {
            categories.push(record.category.clone());
        }
    }
    categories
}

/// Category names paired with how many records each selection would show.
pub fn category_counts(records: &[PlantRecord]) -> Vec<(String, usize)> {
    list_categories(records)
        .into_iter()
        .map(|category| {
            let count = if category == ALL_CATEGORIES {
                records.len()
            } else {
                records
                    .iter()
                    .filter(|record| record.category == category)
                    .count()
            };
            (category, count)
        })
        .collect()
}

pub fn filter_by_category(records: &[PlantRecord], selected: &CategoryFilter) -> Vec<PlantRecord> {
    records
        .iter()
        .filter(|record| selected.matches(record))
        .cloned()
        .collect()
}

/// Orders a copy of `records`. Every ordering is stable, so records with
/// equal keys keep their input order.
pub fn sort_plants(records: &[PlantRecord], sort_key: SortKey) -> Vec<PlantRecord> {
    let mut sorted = records.to_vec();
    match sort_key {
        SortKey::Default => {}
        // `None` orders before every date, which places missing or malformed
        // dates first.
        SortKey::NextWatering => sorted.sort_by_key(PlantRecord::next_watering),
        SortKey::CareLevel => sorted.sort_by_key(PlantRecord::care_priority),
        SortKey::CareLevelReverse => sorted.sort_by_key(|record| Reverse(record.care_priority())),
    }
    sorted
}

pub fn derive_view(
    records: &[PlantRecord],
    selected: &CategoryFilter,
    sort_key: SortKey,
) -> Vec<PlantRecord> {
    sort_plants(&filter_by_category(records, selected), sort_key)
}

/// Records belonging to the signed-in user.
pub fn owned_by(records: &[PlantRecord], email: &str) -> Vec<PlantRecord> {
    records
        .iter()
        .filter(|record| record.is_owned_by(email))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        category_counts, derive_view, filter_by_category, list_categories, owned_by, sort_plants,
    };
    use crate::{CategoryFilter, PlantRecord, SortKey};

    fn plant(name: &str, category: &str, care_level: &str, next: &str) -> PlantRecord {
        PlantRecord {
            plant_name: name.to_owned(),
            category: category.to_owned(),
            care_level: care_level.to_owned(),
            next_watering_date: next.to_owned(),
            ..PlantRecord::default()
        }
    }

    fn names(records: &[PlantRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|record| record.plant_name.as_str())
            .collect()
    }

    fn sample() -> Vec<PlantRecord> {
        vec![
            plant("A", "fern", "Hard", "2024-03-01"),
            plant("B", "succulent", "Easy", "2024-01-01"),
            plant("C", "fern", "Easy", "2024-02-01"),
        ]
    }

    #[test]
    fn categories_start_with_all_in_first_seen_order() {
        assert_eq!(list_categories(&sample()), vec!["all", "fern", "succulent"]);
        assert_eq!(list_categories(&[]), vec!["all"]);
    }

    #[test]
    fn literal_all_category_folds_into_the_all_selection() {
        let mut records = sample();
        records.push(plant("D", "all", "Easy", ""));
        assert_eq!(list_categories(&records), vec!["all", "fern", "succulent"]);
        assert_eq!(category_counts(&records)[0], ("all".to_owned(), 4));
        assert_eq!(
            filter_by_category(&records, &CategoryFilter::parse("all")).len(),
            4
        );
    }

    #[test]
    fn category_counts_cover_all_and_each_category() {
        assert_eq!(
            category_counts(&sample()),
            vec![
                ("all".to_owned(), 3),
                ("fern".to_owned(), 2),
                ("succulent".to_owned(), 1),
            ]
        );
    }

    #[test]
    fn filter_all_is_identity() {
        let records = sample();
        assert_eq!(filter_by_category(&records, &CategoryFilter::All), records);
    }

    #[test]
    fn filter_keeps_matching_records_in_order() {
        let filtered = filter_by_category(&sample(), &CategoryFilter::parse("fern"));
        assert_eq!(names(&filtered), vec!["A", "C"]);
        assert!(filtered.iter().all(|record| record.category == "fern"));

        let none = filter_by_category(&sample(), &CategoryFilter::parse("cactus"));
        assert!(none.is_empty());
    }

    #[test]
    fn care_level_sort_is_stable() {
        let sorted = sort_plants(&sample(), SortKey::CareLevel);
        assert_eq!(names(&sorted), vec!["B", "C", "A"]);
    }

    #[test]
    fn next_watering_sort_is_ascending() {
        let sorted = sort_plants(&sample(), SortKey::NextWatering);
        assert_eq!(names(&sorted), vec!["B", "C", "A"]);
    }

    #[test]
    fn missing_and_malformed_dates_sort_first_in_input_order() {
        let records = vec![
            plant("dated", "fern", "Easy", "2024-01-01"),
            plant("blank", "fern", "Easy", ""),
            plant("garbled", "fern", "Easy", "soon"),
        ];
        let sorted = sort_plants(&records, SortKey::NextWatering);
        assert_eq!(names(&sorted), vec!["blank", "garbled", "dated"]);
    }

    #[test]
    fn care_level_orders_are_reverses_without_ties() {
        let records = vec![
            plant("mid", "fern", "Medium", ""),
            plant("unknown", "fern", "Expert", ""),
            plant("hard", "fern", "difficult", ""),
            plant("easy", "fern", "easy", ""),
        ];
        let ascending = sort_plants(&records, SortKey::CareLevel);
        let mut descending = sort_plants(&records, SortKey::CareLevelReverse);
        assert_eq!(names(&ascending), vec!["easy", "mid", "hard", "unknown"]);
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn reverse_care_sort_keeps_ties_in_input_order() {
        let sorted = sort_plants(&sample(), SortKey::CareLevelReverse);
        assert_eq!(names(&sorted), vec!["A", "B", "C"]);
    }

    #[test]
    fn default_sort_preserves_input() {
        assert_eq!(sort_plants(&sample(), SortKey::Default), sample());
    }

    #[test]
    fn derive_view_filters_then_sorts() {
        let view = derive_view(&sample(), &CategoryFilter::parse("fern"), SortKey::CareLevel);
        assert_eq!(names(&view), vec!["C", "A"]);
        assert_eq!(derive_view(&view, &CategoryFilter::All, SortKey::Default), view);
    }

    #[test]
    fn owned_by_selects_records_for_email() {
        let mut records = sample();
        records[0].user_email = "ana@example.com".to_owned();
        records[2].user_name = "ana@example.com".to_owned();
        assert_eq!(names(&owned_by(&records, "ana@example.com")), vec!["A", "C"]);
    }
}
