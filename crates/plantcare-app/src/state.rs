// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{CategoryFilter, PlantRecord, SortKey, filter_by_category};

/// Selection driving the plant list: category filter, sort order and the
/// status line shown under it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub category: CategoryFilter,
    pub sort: SortKey,
    pub status_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SelectCategory(String),
    ShowAll,
    SetSort(SortKey),
    NextSort,
    PrevSort,
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    CategoryChanged(CategoryFilter),
    SortChanged(SortKey),
    StatusUpdated(String),
    StatusCleared,
}

impl ViewState {
    pub fn new(category: CategoryFilter, sort: SortKey) -> Self {
        Self {
            category,
            sort,
            status_line: None,
        }
    }

    pub fn dispatch(&mut self, command: ViewCommand, records: &[PlantRecord]) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SelectCategory(category) => {
                self.select(CategoryFilter::parse(&category), records)
            }
            ViewCommand::ShowAll => self.select(CategoryFilter::All, records),
            ViewCommand::SetSort(sort) => self.set_sort(sort),
            ViewCommand::NextSort => self.rotate_sort(1),
            ViewCommand::PrevSort => self.rotate_sort(-1),
            ViewCommand::ClearStatus => {
                self.status_line = None;
                vec![ViewEvent::StatusCleared]
            }
        }
    }

    fn select(&mut self, category: CategoryFilter, records: &[PlantRecord]) -> Vec<ViewEvent> {
        self.category = category;
        let mut events = vec![ViewEvent::CategoryChanged(self.category.clone())];
        if self.category != CategoryFilter::All
            && filter_by_category(records, &self.category).is_empty()
        {
            events.push(self.set_status("no plants in this category"));
        } else if self.status_line.is_some() {
            self.status_line = None;
            events.push(ViewEvent::StatusCleared);
        }
        events
    }

    fn set_sort(&mut self, sort: SortKey) -> Vec<ViewEvent> {
        self.sort = sort;
        vec![
            ViewEvent::SortChanged(sort),
            self.set_status(&format!("sorted by {}", sort.label())),
        ]
    }

    fn rotate_sort(&mut self, delta: isize) -> Vec<ViewEvent> {
        let keys = SortKey::ALL;
        let current = keys
            .iter()
            .position(|key| *key == self.sort)
            .unwrap_or(0) as isize;
        let len = keys.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.set_sort(keys[next])
    }

    fn set_status(&mut self, message: &str) -> ViewEvent {
        self.status_line = Some(message.to_owned());
        ViewEvent::StatusUpdated(message.to_owned())
    }
}
