//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdin, stdout, BufRead, Write};
use tracing_subscriber::EnvFilter;

use exercise_picker_lib::{
    parse_color, AppService, Container, DialogSpec, NewWorkoutLog, PickerRequest, PickerView,
};

/// Draws the picker on stdout.
struct TerminalContainer {
    header_color: Color,
}

impl TerminalContainer {
    fn new(header_color: Color) -> Self {
        Self { header_color }
    }
}

impl Container for TerminalContainer {
    fn open(&mut self, dialog: &DialogSpec) {
        println!("\n== {} ==", dialog.title);
        println!("{}", dialog.intro);
    }

    fn render(&mut self, view: &PickerView) {
        print_view(view, self.header_color);
    }

    fn focus_search(&mut self) {
        println!("Type to search ('/text' also searches, e.g. '/21'; '/' clears), a row number to pick, 'q' to close.");
    }

    fn close(&mut self) {
        println!("Picker closed.");
    }
}

/// Draws nothing; used when the view is exported instead.
struct SilentContainer;

impl Container for SilentContainer {
    fn open(&mut self, _dialog: &DialogSpec) {}
    fn render(&mut self, _view: &PickerView) {}
    fn focus_search(&mut self) {}
    fn close(&mut self) {}
}

fn print_view(view: &PickerView, header_color: Color) {
    println!("{}", view.status);
    let mut number = 0;
    for section in &view.sections {
        println!("\n{}", section.title());
        if section.rows.is_empty() {
            continue;
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                header_cell("#", header_color),
                header_cell("Exercise", header_color),
                header_cell("Equipment", header_color),
            ]);
        for row in &section.rows {
            number += 1;
            let name = if row.active {
                Cell::new(format!("{} *", row.name)).add_attribute(Attribute::Bold)
            } else {
                Cell::new(&row.name)
            };
            table.add_row(vec![Cell::new(number), name, Cell::new(&row.equipment)]);
        }
        println!("{table}");
    }
    if let Some(placeholder) = view.placeholder {
        println!("{placeholder}");
    }
}

fn header_cell(text: &str, color: Color) -> Cell {
    Cell::new(text).fg(color)
}

fn write_view_csv(view: &PickerView) -> Result<()> {
    let mut writer = csv::Writer::from_writer(stdout());
    writer.write_record(["section", "row", "id", "name", "equipment", "active"])?;
    for (row_ref, row) in view.rows() {
        writer.write_record([
            row_ref.section.to_string(),
            row_ref.row.to_string(),
            row.exercise_id.clone(),
            row.name.clone(),
            row.equipment.clone(),
            row.active.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn init_logging() {
    // Respect RUST_LOG, default to warnings only; stdout is reserved for the picker
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn run_picker(
    service: &AppService,
    type_: Option<String>,
    current: Option<String>,
    query: Option<String>,
) -> Result<()> {
    let header_color = parse_color(&service.config.theme.header_color)
        .map_or(Color::Green, Into::into);
    let recency = service.recency();
    let request = PickerRequest::new(type_.as_deref(), current.as_deref()).on_select(|id| {
        println!("Selected exercise: {id}");
        Ok(())
    });
    let mut session = service.open_picker(request, &recency, TerminalContainer::new(header_color));
    if let Some(q) = query {
        session.set_query(&q);
    }
    session.run_deferred();

    let mut lines = stdin().lock().lines();
    while session.is_open() {
        print!("{}> ", session.query());
        stdout().flush()?;
        let Some(line) = lines.next() else {
            session.close(); // EOF
            break;
        };
        let input = line.context("Failed to read input")?;
        match cli::parse_picker_input(input.trim_end_matches(['\r', '\n'])) {
            cli::PickerInput::Close => session.close(),
            cli::PickerInput::Search(query) => session.set_query(&query),
            cli::PickerInput::Pick(number) => {
                let target = number
                    .checked_sub(1)
                    .and_then(|index| session.view().rows().nth(index))
                    .map(|(r, _)| r);
                match target {
                    Some(row_ref) => {
                        session.activate(row_ref);
                    }
                    None => println!("No row {number}."),
                }
            }
            cli::PickerInput::Nothing => {}
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = cli::parse_args(); // Parse arguments once

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();
        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    init_logging();

    // Initialize the application service (loads config, connects to DB)
    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Pick {
            type_,
            current,
            query,
        } => run_picker(&service, type_, current, query)?,
        cli::Commands::Show {
            type_,
            current,
            query,
            export_csv,
        } => {
            if export_csv {
                let (view, _) = service.show_picker(
                    type_.as_deref(),
                    current.as_deref(),
                    query.as_deref(),
                    SilentContainer,
                );
                write_view_csv(&view)?;
            } else {
                let header_color = parse_color(&service.config.theme.header_color)
                    .map_or(Color::Green, Into::into);
                service.show_picker(
                    type_.as_deref(),
                    current.as_deref(),
                    query.as_deref(),
                    TerminalContainer::new(header_color),
                );
            }
        }
        cli::Commands::AddExercise {
            id,
            name,
            type_,
            equipment,
        } => {
            let exercise_type = service.resolve_type(Some(&type_));
            service.add_exercise(&exercise_type, &id, &name, equipment.as_deref())?;
            println!(
                "Added {} exercise '{}' (ID: {})",
                service.type_label(&exercise_type),
                name.trim(),
                id.trim()
            );
        }
        cli::Commands::Log {
            type_,
            exercise_id,
            sets,
            reps,
            weight,
            notes,
        } => {
            let id = service.log_workout(&NewWorkoutLog {
                timestamp: None,
                exercise_type: type_,
                exercise_id,
                sets,
                reps,
                weight,
                notes,
            })?;
            println!("Logged workout entry (ID: {id})");
        }
        cli::Commands::Recent { type_ } => {
            let exercise_type = service.resolve_type(type_.as_deref());
            let ids = service.recent_exercise_ids(&exercise_type)?;
            if ids.is_empty() {
                println!("No recent {} picks.", service.type_label(&exercise_type));
            }
            for id in ids {
                println!("{id}");
            }
        }
        cli::Commands::SetDefaultType { exercise_type } => {
            service.set_default_exercise_type(&exercise_type)?;
            println!("Default exercise type set to '{}'.", exercise_type.trim());
        }
        cli::Commands::SetRecentLimit { limit } => {
            service.set_recent_limit(limit)?;
            println!("Remembering {limit} recent picks per type.");
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}
