// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{PlantId, PlantRecord};

/// Acknowledgment for `POST /plants`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertAck {
    pub inserted_id: Option<PlantId>,
}

impl InsertAck {
    pub fn is_success(&self) -> bool {
        self.inserted_id
            .as_ref()
            .is_some_and(|id| !id.as_str().is_empty())
    }
}

/// Acknowledgment for `PUT /plants/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAck {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateAck {
    pub fn is_success(&self) -> bool {
        self.modified_count > 0
    }
}

/// Acknowledgment for `DELETE /plants/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteAck {
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn is_success(&self) -> bool {
        self.deleted_count > 0
    }
}

/// Remote plant storage. An `Err` is a transport or server failure; a
/// successful call can still carry a negative acknowledgment.
pub trait PlantStore {
    fn list_plants(&mut self, limit: Option<usize>) -> Result<Vec<PlantRecord>>;

    fn get_plant(&mut self, id: &PlantId) -> Result<Option<PlantRecord>>;

    fn create_plant(&mut self, record: &PlantRecord) -> Result<InsertAck>;

    fn update_plant(&mut self, id: &PlantId, record: &PlantRecord) -> Result<UpdateAck>;

    fn delete_plant(&mut self, id: &PlantId) -> Result<DeleteAck>;
}

impl<S: PlantStore + ?Sized> PlantStore for &mut S {
    fn list_plants(&mut self, limit: Option<usize>) -> Result<Vec<PlantRecord>> {
        (**self).list_plants(limit)
    }

    fn get_plant(&mut self, id: &PlantId) -> Result<Option<PlantRecord>> {
        (**self).get_plant(id)
    }

    fn create_plant(&mut self, record: &PlantRecord) -> Result<InsertAck> {
        (**self).create_plant(record)
    }

    fn update_plant(&mut self, id: &PlantId, record: &PlantRecord) -> Result<UpdateAck> {
        (**self).update_plant(id, record)
    }

    fn delete_plant(&mut self, id: &PlantId) -> Result<DeleteAck> {
        (**self).delete_plant(id)
    }
}
