// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;
use tracing::debug;

use crate::{
    CareLevel, Category, HealthStatus, PlantId, PlantRecord, PlantStore, SessionProvider,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlantField {
    Image,
    PlantName,
    Category,
    Description,
    CareLevel,
    WateringFrequency,
    LastWateredDate,
    NextWateringDate,
    HealthStatus,
}

impl PlantField {
    pub const ALL: [Self; 9] = [
        Self::Image,
        Self::PlantName,
        Self::Category,
        Self::Description,
        Self::CareLevel,
        Self::WateringFrequency,
        Self::LastWateredDate,
        Self::NextWateringDate,
        Self::HealthStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::PlantName => "plantName",
            Self::Category => "category",
            Self::Description => "description",
            Self::CareLevel => "careLevel",
            Self::WateringFrequency => "wateringFrequency",
            Self::LastWateredDate => "lastWateredDate",
            Self::NextWateringDate => "nextWateringDate",
            Self::HealthStatus => "healthStatus",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image URL",
            Self::PlantName => "plant name",
            Self::Category => "category",
            Self::Description => "description",
            Self::CareLevel => "care level",
            Self::WateringFrequency => "watering frequency",
            Self::LastWateredDate => "last watered date",
            Self::NextWateringDate => "next watering date",
            Self::HealthStatus => "health status",
        }
    }

    pub fn value(self, record: &PlantRecord) -> &str {
        match self {
            Self::Image => &record.image,
            Self::PlantName => &record.plant_name,
            Self::Category => &record.category,
            Self::Description => &record.description,
            Self::CareLevel => &record.care_level,
            Self::WateringFrequency => &record.watering_frequency,
            Self::LastWateredDate => &record.last_watered_date,
            Self::NextWateringDate => &record.next_watering_date,
            Self::HealthStatus => &record.health_status,
        }
    }

    /// Accepts the JSON field name or its snake_case spelling.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "image" => Some(Self::Image),
            "plantName" | "plant_name" | "name" => Some(Self::PlantName),
            "category" => Some(Self::Category),
            "description" => Some(Self::Description),
            "careLevel" | "care_level" => Some(Self::CareLevel),
            "wateringFrequency" | "watering_frequency" => Some(Self::WateringFrequency),
            "lastWateredDate" | "last_watered_date" => Some(Self::LastWateredDate),
            "nextWateringDate" | "next_watering_date" => Some(Self::NextWateringDate),
            "healthStatus" | "health_status" => Some(Self::HealthStatus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVariant {
    /// Three steps: basics, care, schedule.
    Wizard,
    /// Every field on one page.
    SinglePage,
}

impl FormVariant {
    pub const fn steps(self) -> u8 {
        match self {
            Self::Wizard => 3,
            Self::SinglePage => 1,
        }
    }

    /// Fields shown on `step`, required ones first.
    pub fn step_fields(self, step: u8) -> &'static [PlantField] {
        match (self, step) {
            (Self::Wizard, 1) => &[PlantField::Image, PlantField::PlantName, PlantField::Category],
            (Self::Wizard, 2) => &[
                PlantField::Description,
                PlantField::CareLevel,
                PlantField::WateringFrequency,
            ],
            (Self::Wizard, 3) => &[
                PlantField::LastWateredDate,
                PlantField::NextWateringDate,
                PlantField::HealthStatus,
            ],
            (Self::SinglePage, 1) => &PlantField::ALL,
            _ => &[],
        }
    }

    pub fn required_fields(self, step: u8) -> &'static [PlantField] {
        match (self, step) {
            (Self::Wizard, _) => self.step_fields(step),
            (Self::SinglePage, 1) => &[PlantField::PlantName, PlantField::Category],
            (Self::SinglePage, _) => &[],
        }
    }

    pub const fn step_title(self, step: u8) -> &'static str {
        match (self, step) {
            (Self::Wizard, 1) => "Basic information",
            (Self::Wizard, 2) => "Care details",
            (Self::Wizard, 3) => "Watering schedule",
            (Self::SinglePage, 1) => "Plant details",
            _ => "",
        }
    }

    fn blank(self) -> PlantRecord {
        match self {
            Self::Wizard => PlantRecord::default(),
            Self::SinglePage => PlantRecord {
                category: Category::Succulent.as_str().to_owned(),
                care_level: CareLevel::Easy.as_str().to_owned(),
                health_status: HealthStatus::Healthy.as_str().to_owned(),
                ..PlantRecord::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("step {step} of {steps} is not the last step -- complete the remaining steps first")]
    NotOnFinalStep { step: u8, steps: u8 },
    #[error("step {step} is missing {} -- fill it in and retry", field_list(.fields))]
    MissingFields { step: u8, fields: Vec<PlantField> },
}

fn field_list(fields: &[PlantField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no user is signed in -- sign in before adding a plant")]
    NotSignedIn,
    #[error("plant storage did not {operation} the plant: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
    #[error("plant storage request failed")]
    Remote { source: anyhow::Error },
}

/// In-progress plant edit, split across the steps of a form variant.
///
/// A draft built with [`FormDraft::edit`] keeps the record's id and owner
/// fields and submits as an update; otherwise it submits as a create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    variant: FormVariant,
    record: PlantRecord,
    current_step: u8,
}

impl FormDraft {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            variant,
            record: variant.blank(),
            current_step: 1,
        }
    }

    pub fn edit(record: PlantRecord, variant: FormVariant) -> Self {
        Self {
            variant,
            record,
            current_step: 1,
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn steps(&self) -> u8 {
        self.variant.steps()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.steps()
    }

    pub fn editing_id(&self) -> Option<&PlantId> {
        self.record.id.as_ref()
    }

    pub fn get(&self, field: PlantField) -> &str {
        field.value(&self.record)
    }

    pub fn set_field(&mut self, field: PlantField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            PlantField::Image => &mut self.record.image,
            PlantField::PlantName => &mut self.record.plant_name,
            PlantField::Category => &mut self.record.category,
            PlantField::Description => &mut self.record.description,
            PlantField::CareLevel => &mut self.record.care_level,
            PlantField::WateringFrequency => &mut self.record.watering_frequency,
            PlantField::LastWateredDate => &mut self.record.last_watered_date,
            PlantField::NextWateringDate => &mut self.record.next_watering_date,
            PlantField::HealthStatus => &mut self.record.health_status,
        };
        *slot = value;
    }

    /// Required fields of `step` that are still blank.
    pub fn missing_fields(&self, step: u8) -> Vec<PlantField> {
        self.variant
            .required_fields(step)
            .iter()
            .copied()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn is_step_valid(&self, step: u8) -> bool {
        (1..=self.steps()).contains(&step) && self.missing_fields(step).is_empty()
    }

    /// Advances one step when the current step is valid. Returns whether the
    /// step changed.
    pub fn next(&mut self) -> bool {
        if self.current_step < self.steps() && self.is_step_valid(self.current_step) {
            self.current_step += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current_step > 1 {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_last_step() {
            return Err(ValidationError::NotOnFinalStep {
                step: self.current_step,
                steps: self.steps(),
            });
        }
        let fields = self.missing_fields(self.current_step);
        if !fields.is_empty() {
            return Err(ValidationError::MissingFields {
                step: self.current_step,
                fields,
            });
        }
        Ok(())
    }

    /// Clears every field, including single-page defaults, and returns to
    /// step 1.
    pub fn reset(&mut self) {
        self.record = PlantRecord::default();
        self.current_step = 1;
    }

    /// Sends the draft to storage. On acknowledgment the draft resets and
    /// the stored record is returned; on any failure the draft is untouched.
    pub fn submit<S, P>(&mut self, store: &mut S, session: &P) -> Result<PlantRecord, SubmitError>
    where
        S: PlantStore + ?Sized,
        P: SessionProvider + ?Sized,
    {
        self.validate()?;

        let saved = match self.record.id.clone() {
            Some(id) => {
                let record = self.record.clone();
                let ack = store
                    .update_plant(&id, &record)
                    .map_err(|source| SubmitError::Remote { source })?;
                if !ack.is_success() {
                    return Err(SubmitError::Rejected {
                        operation: "update",
                        reason: format!("no changes were saved for plant {id}"),
                    });
                }
                debug!(plant_id = %id, "plant updated");
                record
            }
            None => {
                let user = session.current_user().ok_or(SubmitError::NotSignedIn)?;
                let mut record = self.record.clone();
                record.user_email = user.email.clone();
                record.user_name = user.owner_name();
                let ack = store
                    .create_plant(&record)
                    .map_err(|source| SubmitError::Remote { source })?;
                if !ack.is_success() {
                    return Err(SubmitError::Rejected {
                        operation: "create",
                        reason: "no inserted id in response".to_owned(),
                    });
                }
                record.id = ack.inserted_id;
                debug!(plant_id = ?record.id, "plant created");
                record
            }
        };

        self.reset();
        Ok(saved)
    }
}
