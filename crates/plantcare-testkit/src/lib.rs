// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use plantcare_app::{
    CareLevel, Category, DeleteAck, HealthStatus, InsertAck, PlantId, PlantRecord, PlantStore,
    UpdateAck,
};
use time::macros::format_description;
use time::{Date, Duration, Month};

const PLANT_NAMES: [(&str, Category); 18] = [
    ("Echeveria", Category::Succulent),
    ("Jade Plant", Category::Succulent),
    ("Boston Fern", Category::Fern),
    ("Maidenhair Fern", Category::Fern),
    ("Peace Lily", Category::Flowering),
    ("African Violet", Category::Flowering),
    ("Monstera", Category::Foliage),
    ("Rubber Plant", Category::Foliage),
    ("Basil", Category::Herb),
    ("Rosemary", Category::Herb),
    ("Bird of Paradise", Category::Tropical),
    ("Calathea", Category::Tropical),
    ("Juniper Bonsai", Category::Bonsai),
    ("Ficus Bonsai", Category::Bonsai),
    ("Golden Barrel", Category::Cactus),
    ("Bunny Ears", Category::Cactus),
    ("Golden Pothos", Category::Vine),
    ("String of Pearls", Category::Vine),
];

const WATERING_FREQUENCIES: [(&str, i64); 5] = [
    ("Every 3 days", 3),
    ("Twice a week", 4),
    ("Weekly", 7),
    ("Every 2 weeks", 14),
    ("Monthly", 30),
];

const DESCRIPTIONS: [&str; 6] = [
    "Keep in bright, indirect light.",
    "Let the soil dry out between waterings.",
    "Mist the leaves on dry days.",
    "Rotate a quarter turn every week.",
    "Feed monthly during the growing season.",
    "Keep away from cold drafts.",
];

const OWNERS: [(&str, &str); 4] = [
    ("avery@example.com", "Avery"),
    ("jordan@example.com", "Jordan"),
    ("riley@example.com", "Riley"),
    ("quinn@example.com", "Quinn"),
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of realistic plant records.
#[derive(Debug, Clone)]
pub struct PlantFaker {
    rng: DeterministicRng,
}

impl PlantFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    /// An unsaved plant (no id) owned by one of the fixture owners.
    pub fn plant(&mut self) -> PlantRecord {
        let (email, name) = self.pick(&OWNERS);
        self.plant_for_owner(email, name)
    }

    pub fn plant_for_owner(&mut self, email: &str, name: &str) -> PlantRecord {
        let (plant_name, category) = self.pick(&PLANT_NAMES);
        let (frequency, interval_days) = self.pick(&WATERING_FREQUENCIES);
        let last_watered = reference_date() - Duration::days(self.rng.int_n(30) as i64);
        let next_watering = last_watered + Duration::days(interval_days);

        PlantRecord {
            id: None,
            image: format!(
                "https://images.example.com/plants/{}.jpg",
                plant_name.to_ascii_lowercase().replace(' ', "-")
            ),
            plant_name: plant_name.to_owned(),
            category: category.as_str().to_owned(),
            care_level: self.pick(&CareLevel::ALL).as_str().to_owned(),
            watering_frequency: frequency.to_owned(),
            last_watered_date: format_date(last_watered),
            next_watering_date: format_date(next_watering),
            health_status: self.pick(&HealthStatus::ALL).as_str().to_owned(),
            description: self.pick(&DESCRIPTIONS).to_owned(),
            user_email: email.to_owned(),
            user_name: name.to_owned(),
        }
    }

    /// `count` stored plants with ids `plant-1`, `plant-2`, ...
    pub fn stored_plants(&mut self, count: usize) -> Vec<PlantRecord> {
        (1..=count)
            .map(|index| PlantRecord {
                id: Some(PlantId::new(format!("plant-{index}"))),
                ..self.plant()
            })
            .collect()
    }

    fn pick<T: Copy>(&mut self, values: &[T]) -> T {
        values[self.rng.int_n(values.len())]
    }
}

pub fn reference_date() -> Date {
    Date::from_calendar_date(2026, Month::March, 15).unwrap_or(Date::MIN)
}

fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Failure injected into the next matching [`MemoryStore`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The call returns `Err`, as a dropped connection would.
    Transport,
    /// The call succeeds with a zero count or no inserted id.
    Unacknowledged,
}

/// In-memory stand-in for the plant API.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    plants: Vec<PlantRecord>,
    next_id: u64,
    fault: Option<Fault>,
    calls: Vec<String>,
}

impl MemoryStore {
    pub fn with_plants(plants: Vec<PlantRecord>) -> Self {
        let next_id = plants.len() as u64;
        Self {
            plants,
            next_id,
            ..Self::default()
        }
    }

    pub fn plants(&self) -> &[PlantRecord] {
        &self.plants
    }

    /// Makes the next store call fail in the given way.
    pub fn inject(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }

    /// Operation log, one `"<verb> <id>"` entry per call.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    fn take_fault(&mut self, call: String) -> Option<Fault> {
        self.calls.push(call);
        self.fault.take()
    }

    fn position(&self, id: &PlantId) -> Option<usize> {
        self.plants
            .iter()
            .position(|plant| plant.id.as_ref() == Some(id))
    }
}

impl PlantStore for MemoryStore {
    fn list_plants(&mut self, limit: Option<usize>) -> Result<Vec<PlantRecord>> {
        if self.take_fault("list".to_owned()).is_some() {
            return Err(anyhow!("cannot reach plant API (injected)"));
        }
        let limit = limit.unwrap_or(self.plants.len());
        Ok(self.plants.iter().take(limit).cloned().collect())
    }

    fn get_plant(&mut self, id: &PlantId) -> Result<Option<PlantRecord>> {
        if self.take_fault(format!("get {id}")).is_some() {
            return Err(anyhow!("cannot reach plant API (injected)"));
        }
        Ok(self.position(id).map(|index| self.plants[index].clone()))
    }

    fn create_plant(&mut self, record: &PlantRecord) -> Result<InsertAck> {
        match self.take_fault("create".to_owned()) {
            Some(Fault::Transport) => return Err(anyhow!("cannot reach plant API (injected)")),
            Some(Fault::Unacknowledged) => return Ok(InsertAck::default()),
            None => {}
        }
        self.next_id += 1;
        let id = PlantId::new(format!("plant-{}", self.next_id));
        self.plants.push(PlantRecord {
            id: Some(id.clone()),
            ..record.clone()
        });
        Ok(InsertAck {
            inserted_id: Some(id),
        })
    }

    fn update_plant(&mut self, id: &PlantId, record: &PlantRecord) -> Result<UpdateAck> {
        match self.take_fault(format!("update {id}")) {
            Some(Fault::Transport) => return Err(anyhow!("cannot reach plant API (injected)")),
            Some(Fault::Unacknowledged) => return Ok(UpdateAck::default()),
            None => {}
        }
        let Some(index) = self.position(id) else {
            return Ok(UpdateAck::default());
        };
        let updated = PlantRecord {
            id: Some(id.clone()),
            ..record.clone()
        };
        let modified = u64::from(self.plants[index] != updated);
        self.plants[index] = updated;
        Ok(UpdateAck {
            matched_count: 1,
            modified_count: modified,
        })
    }

    fn delete_plant(&mut self, id: &PlantId) -> Result<DeleteAck> {
        match self.take_fault(format!("delete {id}")) {
            Some(Fault::Transport) => return Err(anyhow!("cannot reach plant API (injected)")),
            Some(Fault::Unacknowledged) => return Ok(DeleteAck::default()),
            None => {}
        }
        let deleted_count = match self.position(id) {
            Some(index) => {
                self.plants.remove(index);
                1
            }
            None => 0,
        };
        Ok(DeleteAck { deleted_count })
    }
}
