// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use plantcare_app::{
    CategoryFilter, DeleteError, DeleteOutcome, FormDraft, FormVariant, LocalSession,
    PlantCollection, PlantField, PlantId, PlantStore, SortKey, SubmitError, ViewCommand,
    ViewState, owned_by,
};
use plantcare_testkit::{Fault, MemoryStore, PlantFaker};

fn signed_in() -> Result<LocalSession> {
    LocalSession::signed_in("maya@example.com", None)
}

#[test]
fn wizard_submission_shows_up_in_the_owner_listing() -> Result<()> {
    let mut store = MemoryStore::with_plants(PlantFaker::new(11).stored_plants(5));
    let session = signed_in()?;

    let mut draft = FormDraft::new(FormVariant::Wizard);
    draft.set_field(PlantField::Image, "https://images.example.com/fern.jpg");
    draft.set_field(PlantField::PlantName, "Staghorn Fern");
    draft.set_field(PlantField::Category, "fern");
    assert!(draft.next());
    draft.set_field(PlantField::Description, "Mount on a board");
    draft.set_field(PlantField::CareLevel, "moderate");
    draft.set_field(PlantField::WateringFrequency, "Weekly");
    assert!(draft.next());
    draft.set_field(PlantField::LastWateredDate, "2026-03-10");
    draft.set_field(PlantField::NextWateringDate, "2026-03-17");
    draft.set_field(PlantField::HealthStatus, "Good");

    let saved = draft.submit(&mut store, &session)?;
    assert_eq!(saved.user_name, "maya");

    let mine = owned_by(&store.list_plants(None)?, "maya@example.com");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].plant_name, "Staghorn Fern");
    assert_eq!(mine[0].id, saved.id);
    Ok(())
}

#[test]
fn unacknowledged_create_keeps_the_draft_for_retry() -> Result<()> {
    let mut store = MemoryStore::default();
    let session = signed_in()?;
    let mut draft = FormDraft::new(FormVariant::SinglePage);
    draft.set_field(PlantField::PlantName, "Aloe");

    store.inject(Fault::Unacknowledged);
    let error = draft
        .submit(&mut store, &session)
        .expect_err("no inserted id");
    assert!(matches!(error, SubmitError::Rejected { .. }));
    assert_eq!(draft.get(PlantField::PlantName), "Aloe");
    assert!(store.plants().is_empty());

    draft.submit(&mut store, &session)?;
    assert_eq!(store.plants().len(), 1);
    Ok(())
}

#[test]
fn edit_round_trip_through_store() -> Result<()> {
    let mut store = MemoryStore::with_plants(PlantFaker::new(5).stored_plants(3));
    let id = PlantId::new("plant-2");
    let existing = store.get_plant(&id)?.expect("fixture plant");

    let mut draft = FormDraft::edit(existing.clone(), FormVariant::SinglePage);
    draft.set_field(PlantField::Description, "Repotted into terracotta");
    draft.submit(&mut store, &signed_in()?)?;

    let updated = store.get_plant(&id)?.expect("updated plant");
    assert_eq!(updated.description, "Repotted into terracotta");
    assert_eq!(updated.user_email, existing.user_email);
    Ok(())
}

#[test]
fn delete_reconciles_only_after_storage_acknowledges() -> Result<()> {
    let fixtures = PlantFaker::new(21).stored_plants(4);
    let mut store = MemoryStore::with_plants(fixtures.clone());
    let mut plants = PlantCollection::new(store.list_plants(None)?);
    let target = PlantId::new("plant-3");

    store.inject(Fault::Transport);
    let error = plants
        .delete_with(&target, &mut store, |_| true)
        .expect_err("transport failure");
    assert!(matches!(error, DeleteError::Remote { .. }));
    assert_eq!(plants.records(), fixtures.as_slice());

    let outcome = plants.delete_with(&target, &mut store, |_| true)?;
    assert!(matches!(outcome, DeleteOutcome::Deleted(_)));
    assert_eq!(plants.len(), 3);
    assert_eq!(store.plants().len(), 3);
    assert_eq!(store.calls().last().map(String::as_str), Some("delete plant-3"));
    Ok(())
}

#[test]
fn view_state_drives_collection_view() -> Result<()> {
    let mut store = MemoryStore::with_plants(PlantFaker::new(8).stored_plants(20));
    let plants = PlantCollection::new(store.list_plants(None)?);
    let mut state = ViewState::default();

    let category = plants.categories()[1].clone();
    state.dispatch(ViewCommand::SelectCategory(category.clone()), plants.records());
    state.dispatch(ViewCommand::SetSort(SortKey::NextWatering), plants.records());

    let view = plants.view(&state);
    assert!(!view.is_empty());
    assert!(view.iter().all(|plant| plant.category == category));
    assert!(
        view.windows(2)
            .all(|pair| pair[0].next_watering() <= pair[1].next_watering())
    );

    state.dispatch(ViewCommand::ShowAll, plants.records());
    assert_eq!(state.category, CategoryFilter::All);
    assert_eq!(plants.view(&state).len(), 20);
    Ok(())
}

#[test]
fn list_limit_truncates() -> Result<()> {
    let mut store = MemoryStore::with_plants(PlantFaker::new(2).stored_plants(10));
    assert_eq!(store.list_plants(Some(6))?.len(), 6);
    Ok(())
}
