//! `gms gardens ...` and `gms plants ...`: the list views on the command
//! line.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use clap::Subcommand;
use uuid::Uuid;

use gms_core::list_view::{
    BannerKind, Confirm, DeleteOutcome, ListController, Listable, ResourceApi,
};
use gms_db::models::{Garden, Plant};

#[derive(Subcommand)]
pub enum GardenCommands {
    /// List all gardens
    List,
    /// Delete a garden by ID
    Delete {
        /// Garden ID
        garden_id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PlantCommands {
    /// List all plants
    List,
    /// Delete a plant by ID
    Delete {
        /// Plant ID (UUID)
        plant_id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

// -----------------------------------------------------------------------
// Table columns
// -----------------------------------------------------------------------

/// How an entity is laid out as a table row, shared with the dashboard.
pub trait Columns {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Columns for Garden {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Location", "Description", "Created"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.garden_id.to_string(),
            self.name.clone(),
            self.location.clone(),
            self.description.clone().unwrap_or_default(),
            self.date_created.format("%Y-%m-%d").to_string(),
        ]
    }
}

impl Columns for Plant {
    const HEADERS: &'static [&'static str] = &["ID", "Garden", "Name", "Type", "Status", "Planted"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.garden_id.to_string(),
            self.name.clone(),
            self.plant_type.clone(),
            self.status.clone(),
            self.date_planted.to_string(),
        ]
    }
}

/// Render rows as a left-aligned, space-padded text table.
pub fn format_table<R: Columns>(items: &[R]) -> String {
    let rows: Vec<Vec<String>> = items.iter().map(Columns::cells).collect();
    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = R::HEADERS.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

// -----------------------------------------------------------------------
// Confirmation
// -----------------------------------------------------------------------

/// Prompts on stderr and reads one line from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{question} [y/N] ");
        let _ = stderr.flush();
        read_answer(&mut std::io::stdin().lock())
    }
}

fn read_answer(input: &mut impl BufRead) -> bool {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => is_yes(&line),
        Err(_) => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// -----------------------------------------------------------------------
// Commands
// -----------------------------------------------------------------------

pub async fn run_garden_command<A: ResourceApi<Garden>>(command: GardenCommands, api: A) -> Result<()> {
    match command {
        GardenCommands::List => run_list::<Garden, A>(api).await,
        GardenCommands::Delete { garden_id, yes } => run_delete::<Garden, A>(api, garden_id, yes).await,
    }
}

pub async fn run_plant_command<A: ResourceApi<Plant>>(command: PlantCommands, api: A) -> Result<()> {
    match command {
        PlantCommands::List => run_list::<Plant, A>(api).await,
        PlantCommands::Delete { plant_id, yes } => run_delete::<Plant, A>(api, plant_id, yes).await,
    }
}

async fn run_list<R, A>(api: A) -> Result<()>
where
    R: Listable + Columns,
    A: ResourceApi<R>,
{
    let mut controller: ListController<R, A> = ListController::new(api);
    controller.init().await;

    if controller.items().is_empty() {
        println!("No {}s found.", R::ENTITY);
    } else {
        print!("{}", format_table(controller.items()));
    }
    Ok(())
}

async fn run_delete<R, A>(api: A, id: R::Id, yes: bool) -> Result<()>
where
    R: Listable,
    A: ResourceApi<R>,
{
    let mut controller: ListController<R, A> = ListController::new(api);
    let outcome = if yes {
        controller.delete(&id, &true).await
    } else {
        controller.delete(&id, &StdinConfirm).await
    };

    match (outcome, controller.banner()) {
        (DeleteOutcome::Declined, _) => {
            println!("Cancelled.");
            Ok(())
        }
        (_, Some(banner)) if banner.kind == BannerKind::Error => bail!(banner.message),
        (_, Some(banner)) => {
            println!("{}", banner.message);
            Ok(())
        }
        (_, None) => Ok(()),
    }
}
