// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use plantcare_app::{
    ALL_CATEGORIES, CareLevel, Category, DeleteOutcome, FormDraft, FormVariant,
    HealthStatus, PlantCollection, PlantField, PlantId, PlantRecord, PlantStore, SessionProvider,
    SortKey, ViewCommand, ViewState, owned_by,
};
use std::io::{BufRead, Write};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub category: Option<String>,
    pub sort: Option<SortKey>,
    pub mine: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(ListOptions),
    Categories {
        mine: bool,
    },
    Show {
        id: PlantId,
    },
    Add {
        wizard: bool,
        assignments: Vec<FieldAssignment>,
    },
    Update {
        id: PlantId,
        assignments: Vec<FieldAssignment>,
    },
    Delete {
        id: PlantId,
        assume_yes: bool,
    },
}

/// One `--set field=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: PlantField,
    pub value: String,
}

impl FieldAssignment {
    pub fn parse(raw: &str) -> Result<Self> {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("--set expects field=value, got {raw:?}"))?;
        let field = PlantField::parse(name).ok_or_else(|| {
            anyhow!(
                "unknown field {name:?}; use one of: {}",
                PlantField::ALL
                    .iter()
                    .map(|field| field.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        Ok(Self {
            field,
            value: value.trim().to_owned(),
        })
    }
}

/// Executes CLI commands against a plant store, reading answers from
/// `input` and writing results to `output`.
pub struct Runtime<S, P, R, W> {
    store: S,
    session: P,
    view: ViewState,
    input: R,
    output: W,
}

impl<S, P, R, W> Runtime<S, P, R, W>
where
    S: PlantStore,
    P: SessionProvider,
    R: BufRead,
    W: Write,
{
    pub fn new(store: S, session: P, view: ViewState, input: R, output: W) -> Self {
        Self {
            store,
            session,
            view,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::List(options) => self.list(options),
            Command::Categories { mine } => self.categories(mine),
            Command::Show { id } => self.show(&id),
            Command::Add {
                wizard,
                assignments,
            } => self.add(wizard, &assignments),
            Command::Update { id, assignments } => self.update(&id, &assignments),
            Command::Delete { id, assume_yes } => self.delete(&id, assume_yes),
        }
    }

    fn list(&mut self, options: ListOptions) -> Result<()> {
        let plants = self.fetch(options.mine, options.limit)?;

        let mut state = self.view.clone();
        if let Some(sort) = options.sort {
            state.dispatch(ViewCommand::SetSort(sort), plants.records());
        }
        let category = options
            .category
            .unwrap_or_else(|| state.category.as_str().to_owned());
        state.dispatch(ViewCommand::SelectCategory(category), plants.records());

        let view = plants.view(&state);
        if view.is_empty() {
            let message = state.status_line.as_deref().unwrap_or("no plants yet");
            writeln!(self.output, "{message}")?;
            return Ok(());
        }
        write!(self.output, "{}", render_table(&view))?;
        Ok(())
    }

    fn categories(&mut self, mine: bool) -> Result<()> {
        let plants = self.fetch(mine, None)?;
        for (name, count) in plants.category_counts() {
            writeln!(self.output, "{:<12} {count}", category_label(&name))?;
        }
        Ok(())
    }

    fn show(&mut self, id: &PlantId) -> Result<()> {
        let record = self.load(id)?;
        writeln!(self.output, "{:<20} {id}", "id")?;
        for field in PlantField::ALL {
            writeln!(self.output, "{:<20} {}", field.label(), field.value(&record))?;
        }
        writeln!(
            self.output,
            "{:<20} {} <{}>",
            "owner", record.user_name, record.user_email
        )?;
        Ok(())
    }

    fn add(&mut self, wizard: bool, assignments: &[FieldAssignment]) -> Result<()> {
        let variant = if wizard {
            FormVariant::Wizard
        } else {
            FormVariant::SinglePage
        };
        let mut draft = FormDraft::new(variant);
        apply(&mut draft, assignments);
        if wizard {
            self.fill_wizard(&mut draft)?;
        }

        let saved = draft.submit(&mut self.store, &self.session)?;
        let id = saved.id.as_ref().map_or("-", PlantId::as_str);
        info!(plant_id = id, "plant added");
        writeln!(self.output, "added {:?} ({id})", saved.plant_name)?;
        Ok(())
    }

    fn update(&mut self, id: &PlantId, assignments: &[FieldAssignment]) -> Result<()> {
        if assignments.is_empty() {
            bail!("update needs at least one --set field=value");
        }
        let record = self.load(id)?;
        let mut draft = FormDraft::edit(record, FormVariant::SinglePage);
        apply(&mut draft, assignments);

        let saved = draft.submit(&mut self.store, &self.session)?;
        info!(plant_id = %id, "plant updated");
        writeln!(self.output, "updated {:?} ({id})", saved.plant_name)?;
        Ok(())
    }

    fn delete(&mut self, id: &PlantId, assume_yes: bool) -> Result<()> {
        let records = self.store.list_plants(None).context("load plants")?;
        let mut plants = PlantCollection::new(records);

        let Self {
            store,
            input,
            output,
            ..
        } = self;
        let mut prompt_error = None;
        let outcome = plants.delete_with(id, store, |request| {
            if assume_yes {
                return true;
            }
            match confirm(&mut *input, &mut *output, &request.prompt()) {
                Ok(answer) => answer,
                Err(error) => {
                    prompt_error = Some(error);
                    false
                }
            }
        });
        if let Some(error) = prompt_error {
            return Err(error);
        }

        match outcome? {
            DeleteOutcome::Cancelled => writeln!(output, "delete cancelled")?,
            DeleteOutcome::Deleted(record) => {
                info!(plant_id = %id, "plant deleted");
                writeln!(output, "deleted {:?}", record.plant_name)?;
            }
        }
        Ok(())
    }

    /// With `mine`, the limit applies to the user's plants rather than to
    /// the server listing.
    fn fetch(&mut self, mine: bool, limit: Option<usize>) -> Result<PlantCollection> {
        if !mine {
            let records = self.store.list_plants(limit).context("load plants")?;
            return Ok(PlantCollection::new(records));
        }
        let user = self.session.current_user().ok_or_else(|| {
            anyhow!("--mine needs a signed-in user -- set [session].email in the config")
        })?;
        let records = self.store.list_plants(None).context("load plants")?;
        let mut owned = owned_by(&records, &user.email);
        if let Some(limit) = limit {
            owned.truncate(limit);
        }
        Ok(PlantCollection::new(owned))
    }

    fn load(&mut self, id: &PlantId) -> Result<PlantRecord> {
        self.store
            .get_plant(id)
            .with_context(|| format!("load plant {id}"))?
            .ok_or_else(|| anyhow!("plant {id} not found -- run `plantcare list` to see plant ids"))
    }

    /// Prompts for every field of each wizard step until the draft reaches
    /// a complete final step. Blank answers keep the current value.
    fn fill_wizard(&mut self, draft: &mut FormDraft) -> Result<()> {
        loop {
            let step = draft.current_step();
            let variant = draft.variant();
            writeln!(
                self.output,
                "Step {step} of {}: {}",
                draft.steps(),
                variant.step_title(step)
            )?;
            for &field in variant.step_fields(step) {
                let answer = prompt(
                    &mut self.input,
                    &mut self.output,
                    &field_prompt(field, draft.get(field)),
                )?;
                if !answer.is_empty() {
                    draft.set_field(field, answer);
                }
            }

            if draft.is_last_step() && draft.is_step_valid(step) {
                return Ok(());
            }
            if !draft.next() {
                let missing = draft
                    .missing_fields(step)
                    .iter()
                    .map(|field| field.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(self.output, "still missing: {missing}")?;
            }
        }
    }
}

fn apply(draft: &mut FormDraft, assignments: &[FieldAssignment]) {
    for assignment in assignments {
        draft.set_field(assignment.field, assignment.value.clone());
    }
}

fn field_prompt(field: PlantField, current: &str) -> String {
    let choices = match field {
        PlantField::Category => Category::ALL.iter().map(|c| c.as_str()).collect(),
        PlantField::CareLevel => CareLevel::ALL.iter().map(|c| c.as_str()).collect(),
        PlantField::HealthStatus => HealthStatus::ALL.iter().map(|h| h.as_str()).collect(),
        PlantField::LastWateredDate | PlantField::NextWateringDate => vec!["YYYY-MM-DD"],
        _ => Vec::new(),
    };

    let mut label = field.label().to_owned();
    if !choices.is_empty() {
        label.push_str(&format!(" ({})", choices.join(", ")));
    }
    if !current.is_empty() {
        label.push_str(&format!(" [{current}]"));
    }
    label
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("read answer")? == 0 {
        bail!("input ended before the form was complete");
    }
    Ok(line.trim().to_owned())
}

fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("read confirmation")?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn category_label(name: &str) -> &str {
    if name == ALL_CATEGORIES {
        return "All";
    }
    Category::parse(name).map_or(name, |c| c.label())
}

/// Fixed-width table of the rows the list command shows.
pub fn render_table(plants: &[PlantRecord]) -> String {
    const HEADERS: [&str; 6] = ["ID", "NAME", "CATEGORY", "CARE", "NEXT WATERING", "HEALTH"];

    let rows: Vec<[String; 6]> = plants
        .iter()
        .map(|plant| {
            [
                plant
                    .id
                    .as_ref()
                    .map_or_else(|| "-".to_owned(), ToString::to_string),
                plant.plant_name.clone(),
                plant.category.clone(),
                plant.care_level_label().to_owned(),
                plant.next_watering_date.clone(),
                plant.health_status.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };
    push_row(&HEADERS);
    for row in &rows {
        push_row(&row.each_ref().map(String::as_str));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        Command, FieldAssignment, ListOptions, Runtime, category_label, field_prompt,
        render_table,
    };
    use anyhow::Result;
    use plantcare_app::{
        CategoryFilter, LocalSession, PlantField, PlantId, PlantRecord, SortKey, ViewState,
    };
    use plantcare_testkit::{Fault, MemoryStore};
    use std::io::Cursor;

    fn plant(id: &str, name: &str, category: &str, care: &str, next: &str) -> PlantRecord {
        PlantRecord {
            id: Some(PlantId::new(id)),
            plant_name: name.to_owned(),
            category: category.to_owned(),
            care_level: care.to_owned(),
            next_watering_date: next.to_owned(),
            health_status: "Healthy".to_owned(),
            user_email: "maya@example.com".to_owned(),
            user_name: "maya".to_owned(),
            ..PlantRecord::default()
        }
    }

    fn fixtures() -> Vec<PlantRecord> {
        vec![
            plant("a", "Aloe", "succulent", "Hard", "2024-05-03"),
            plant("b", "Basil", "herb", "Easy", "2024-05-01"),
            PlantRecord {
                user_email: "avery@example.com".to_owned(),
                user_name: "Avery".to_owned(),
                ..plant("c", "Calathea", "tropical", "medium", "2024-05-02")
            },
        ]
    }

    type TestRuntime = Runtime<MemoryStore, LocalSession, Cursor<Vec<u8>>, Vec<u8>>;

    fn runtime(store: MemoryStore, input: &str) -> Result<TestRuntime> {
        Ok(Runtime::new(
            store,
            LocalSession::signed_in("maya@example.com", None)?,
            ViewState::default(),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        ))
    }

    fn output(runtime: TestRuntime) -> Result<String> {
        Ok(String::from_utf8(runtime.into_output())?)
    }

    #[test]
    fn list_sorts_by_care_level() -> Result<()> {
        let mut runtime = runtime(MemoryStore::with_plants(fixtures()), "")?;
        runtime.execute(Command::List(ListOptions {
            sort: Some(SortKey::CareLevel),
            ..ListOptions::default()
        }))?;

        let text = output(runtime)?;
        let names: Vec<_> = text
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().nth(1))
            .collect();
        assert_eq!(names, vec!["Basil", "Calathea", "Aloe"]);
        Ok(())
    }

    #[test]
    fn list_mine_and_category_filter() -> Result<()> {
        let mut runtime = runtime(MemoryStore::with_plants(fixtures()), "")?;
        runtime.execute(Command::List(ListOptions {
            mine: true,
            category: Some("tropical".to_owned()),
            ..ListOptions::default()
        }))?;
        assert_eq!(output(runtime)?, "no plants in this category\n");
        Ok(())
    }

    #[test]
    fn list_mine_limit_counts_only_owned_plants() -> Result<()> {
        let mut records = fixtures();
        records.rotate_right(1);
        let mut runtime = runtime(MemoryStore::with_plants(records), "")?;
        runtime.execute(Command::List(ListOptions {
            mine: true,
            limit: Some(2),
            ..ListOptions::default()
        }))?;

        let text = output(runtime)?;
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Aloe"));
        assert!(text.contains("Basil"));
        assert!(!text.contains("Calathea"));
        Ok(())
    }

    #[test]
    fn list_uses_configured_view_state() -> Result<()> {
        let mut runtime = Runtime::new(
            MemoryStore::with_plants(fixtures()),
            LocalSession::default(),
            ViewState::new(CategoryFilter::Only("herb".to_owned()), SortKey::Default),
            Cursor::new(Vec::new()),
            Vec::new(),
        );
        runtime.execute(Command::List(ListOptions::default()))?;
        let text = String::from_utf8(runtime.into_output())?;
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Basil"));
        Ok(())
    }

    #[test]
    fn mine_without_session_is_an_error() {
        let mut runtime = Runtime::new(
            MemoryStore::with_plants(fixtures()),
            LocalSession::default(),
            ViewState::default(),
            Cursor::new(Vec::new()),
            Vec::new(),
        );
        let error = runtime
            .execute(Command::Categories { mine: true })
            .expect_err("no session");
        assert!(error.to_string().contains("[session].email"));
    }

    #[test]
    fn categories_print_counts() -> Result<()> {
        let mut runtime = runtime(MemoryStore::with_plants(fixtures()), "")?;
        runtime.execute(Command::Categories { mine: false })?;
        let text = output(runtime)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("All"));
        assert!(lines[0].ends_with('3'));
        assert!(lines[1].starts_with("Succulent"));
        Ok(())
    }

    #[test]
    fn show_unknown_plant_is_actionable() -> Result<()> {
        let mut runtime = runtime(MemoryStore::with_plants(fixtures()), "")?;
        let error = runtime
            .execute(Command::Show {
                id: PlantId::new("zzz"),
            })
            .expect_err("unknown id");
        assert!(error.to_string().contains("plantcare list"));
        Ok(())
    }

    #[test]
    fn add_single_page_uses_defaults_and_session_owner() -> Result<()> {
        let mut runtime = runtime(MemoryStore::default(), "")?;
        runtime.execute(Command::Add {
            wizard: false,
            assignments: vec![FieldAssignment::parse("plantName=Snake Plant")?],
        })?;
        assert!(output(runtime)?.starts_with("added \"Snake Plant\""));
        Ok(())
    }

    #[test]
    fn add_wizard_reprompts_until_step_is_complete() -> Result<()> {
        let answers = [
            // step 1, name left blank, then completed
            "https://img.example.com/p.jpg",
            "",
            "fern",
            "",
            "Boston Fern",
            "",
            // step 2
            "Likes humidity",
            "moderate",
            "Weekly",
            // step 3
            "2026-03-10",
            "2026-03-17",
            "Good",
        ]
        .join("\n");
        let mut runtime = runtime(MemoryStore::default(), &answers)?;
        runtime.execute(Command::Add {
            wizard: true,
            assignments: Vec::new(),
        })?;

        let text = output(runtime)?;
        assert!(text.contains("still missing: plant name"));
        assert!(text.contains("Step 3 of 3: Watering schedule"));
        assert!(text.contains("added \"Boston Fern\""));
        Ok(())
    }

    #[test]
    fn wizard_stops_when_input_ends() -> Result<()> {
        let mut runtime = runtime(MemoryStore::default(), "https://img\nAloe\n")?;
        let error = runtime
            .execute(Command::Add {
                wizard: true,
                assignments: Vec::new(),
            })
            .expect_err("input ends mid-form");
        assert!(error.to_string().contains("input ended"));
        Ok(())
    }

    #[test]
    fn update_requires_assignments_and_applies_them() -> Result<()> {
        let mut runtime = runtime(MemoryStore::with_plants(fixtures()), "")?;
        let error = runtime
            .execute(Command::Update {
                id: PlantId::new("a"),
                assignments: Vec::new(),
            })
            .expect_err("nothing to update");
        assert!(error.to_string().contains("--set"));

        runtime.execute(Command::Update {
            id: PlantId::new("a"),
            assignments: vec![FieldAssignment::parse("health_status=Wilting")?],
        })?;
        assert!(output(runtime)?.contains("updated \"Aloe\""));
        Ok(())
    }

    #[test]
    fn delete_asks_and_honors_no() -> Result<()> {
        let mut runtime = runtime(MemoryStore::with_plants(fixtures()), "n\n")?;
        runtime.execute(Command::Delete {
            id: PlantId::new("b"),
            assume_yes: false,
        })?;
        let text = output(runtime)?;
        assert!(text.contains("Delete \"Basil\"?"));
        assert!(text.ends_with("delete cancelled\n"));
        Ok(())
    }

    #[test]
    fn delete_with_yes_skips_prompt() -> Result<()> {
        let mut runtime = runtime(MemoryStore::with_plants(fixtures()), "")?;
        runtime.execute(Command::Delete {
            id: PlantId::new("b"),
            assume_yes: true,
        })?;
        assert_eq!(output(runtime)?, "deleted \"Basil\"\n");
        Ok(())
    }

    #[test]
    fn delete_surfaces_storage_failure() -> Result<()> {
        let mut store = MemoryStore::with_plants(fixtures());
        store.inject(Fault::Transport);
        let mut runtime = runtime(store, "")?;
        let error = runtime
            .execute(Command::Delete {
                id: PlantId::new("b"),
                assume_yes: true,
            })
            .expect_err("list fails");
        assert!(format!("{error:#}").contains("load plants"));
        Ok(())
    }

    #[test]
    fn field_assignment_parsing() -> Result<()> {
        let parsed = FieldAssignment::parse("careLevel= easy ")?;
        assert_eq!(parsed.field, PlantField::CareLevel);
        assert_eq!(parsed.value, "easy");
        assert!(FieldAssignment::parse("careLevel").is_err());
        assert!(FieldAssignment::parse("owner=me").is_err());
        Ok(())
    }

    #[test]
    fn prompts_show_choices_and_current_value() {
        assert_eq!(
            field_prompt(PlantField::CareLevel, "easy"),
            "care level (easy, moderate, difficult) [easy]"
        );
        assert_eq!(field_prompt(PlantField::PlantName, ""), "plant name");
        assert_eq!(category_label("all"), "All");
        assert_eq!(category_label("moss"), "moss");
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&fixtures()[..2]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  NAME   CATEGORY"));
        assert!(lines[1].starts_with("a   Aloe   succulent"));
    }
}
