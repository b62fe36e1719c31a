// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;
use tracing::debug;

use crate::{
    PlantId, PlantRecord, PlantStore, ViewState, category_counts, derive_view, list_categories,
};

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("plant {id} is not in the current list -- refresh and retry")]
    UnknownPlant { id: PlantId },
    #[error("plant {id} was not deleted -- it may already be gone; refresh and retry")]
    NotDeleted { id: PlantId },
    #[error("failed to delete plant {id}")]
    Remote { id: PlantId, source: anyhow::Error },
}

/// Plant records owned by the view between fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantCollection {
    records: Vec<PlantRecord>,
}

impl PlantCollection {
    pub fn new(records: Vec<PlantRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &PlantId) -> Option<&PlantRecord> {
        self.records
            .iter()
            .find(|record| record.id.as_ref() == Some(id))
    }

    pub fn categories(&self) -> Vec<String> {
        list_categories(&self.records)
    }

    pub fn category_counts(&self) -> Vec<(String, usize)> {
        category_counts(&self.records)
    }

    pub fn view(&self, state: &ViewState) -> Vec<PlantRecord> {
        derive_view(&self.records, &state.category, state.sort)
    }

    /// First phase of a delete. Nothing changes until the returned request
    /// is confirmed, executed, and its result reconciled.
    pub fn request_delete(&self, id: &PlantId) -> Result<DeleteRequest, DeleteError> {
        let record = self
            .get(id)
            .ok_or_else(|| DeleteError::UnknownPlant { id: id.clone() })?;
        Ok(DeleteRequest {
            id: id.clone(),
            plant_name: record.plant_name.clone(),
        })
    }

    /// Drops the deleted record from the local list.
    pub fn reconcile(&mut self, deleted: DeletedPlant) -> Option<PlantRecord> {
        let index = self
            .records
            .iter()
            .position(|record| record.id.as_ref() == Some(&deleted.id))?;
        Some(self.records.remove(index))
    }

    /// Runs the full sequence: request, ask `confirm`, delete remotely, then
    /// reconcile on success.
    pub fn delete_with<S, F>(
        &mut self,
        id: &PlantId,
        store: &mut S,
        confirm: F,
    ) -> Result<DeleteOutcome, DeleteError>
    where
        S: PlantStore + ?Sized,
        F: FnOnce(&DeleteRequest) -> bool,
    {
        let request = self.request_delete(id)?;
        let confirmed = confirm(&request);
        let Some(confirmed) = request.resolve(confirmed) else {
            return Ok(DeleteOutcome::Cancelled);
        };
        let deleted = confirmed.execute(store)?;
        match self.reconcile(deleted) {
            Some(record) => Ok(DeleteOutcome::Deleted(record)),
            None => Err(DeleteError::UnknownPlant { id: id.clone() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted(PlantRecord),
}

/// A delete waiting for the user's yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a delete request does nothing until it is confirmed and executed"]
pub struct DeleteRequest {
    id: PlantId,
    plant_name: String,
}

impl DeleteRequest {
    pub fn id(&self) -> &PlantId {
        &self.id
    }

    pub fn plant_name(&self) -> &str {
        &self.plant_name
    }

    pub fn prompt(&self) -> String {
        format!(
            "Delete {:?}? You won't be able to revert this.",
            self.plant_name
        )
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }

    pub fn resolve(self, confirmed: bool) -> Option<ConfirmedDelete> {
        confirmed.then(|| self.confirm())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a confirmed delete does nothing until it is executed"]
pub struct ConfirmedDelete {
    id: PlantId,
}

impl ConfirmedDelete {
    /// Issues the remote delete. Only a positive deleted count yields a
    /// [`DeletedPlant`].
    pub fn execute<S>(self, store: &mut S) -> Result<DeletedPlant, DeleteError>
    where
        S: PlantStore + ?Sized,
    {
        let ack = store
            .delete_plant(&self.id)
            .map_err(|source| DeleteError::Remote {
                id: self.id.clone(),
                source,
            })?;
        if !ack.is_success() {
            return Err(DeleteError::NotDeleted { id: self.id });
        }
        debug!(plant_id = %self.id, deleted = ack.deleted_count, "plant deleted");
        Ok(DeletedPlant { id: self.id })
    }
}

/// Proof that storage acknowledged a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "reconcile the collection with the deleted plant"]
pub struct DeletedPlant {
    id: PlantId,
}

impl DeletedPlant {
    pub fn id(&self) -> &PlantId {
        &self.id
    }
}
