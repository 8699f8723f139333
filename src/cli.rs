// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick the exercise shown on your progress chart", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive exercise picker
    Pick {
        /// Exercise type (defaults to the configured type)
        #[arg(short, long = "type")]
        type_: Option<String>,
        /// ID of the exercise currently shown on the chart
        #[arg(short, long)]
        current: Option<String>,
        /// Initial search text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Print the picker sections once without selecting anything
    Show {
        #[arg(short, long = "type")]
        type_: Option<String>,
        #[arg(short, long)]
        current: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
        /// Write rows as CSV to stdout instead of tables
        #[arg(long)]
        export_csv: bool,
    },
    /// Add an exercise definition to the catalog
    AddExercise {
        /// Unique exercise ID (e.g., "bench-press")
        #[arg(long)]
        id: String,
        /// Display name (e.g., "Bench Press")
        #[arg(short, long)]
        name: String,
        #[arg(short, long = "type")]
        type_: String,
        /// Equipment needed (e.g., "Barbell")
        #[arg(short, long)]
        equipment: Option<String>,
    },
    /// Log a workout entry for an exercise
    Log {
        #[arg(short, long = "type")]
        type_: String,
        /// ID of the exercise performed
        #[arg(short, long)]
        exercise_id: String,
        #[arg(short, long)]
        sets: Option<i64>,
        #[arg(short, long)]
        reps: Option<i64>,
        #[arg(short, long)]
        weight: Option<f64>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List the most recently picked exercises for a type
    Recent {
        #[arg(short, long = "type")]
        type_: Option<String>,
    },
    /// Set the exercise type used when none is given
    SetDefaultType { exercise_type: String },
    /// Set how many recent picks are remembered per type
    SetRecentLimit { limit: u32 },
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Generate shell completion scripts
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Used by completion generation
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

/// One line typed into the interactive picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerInput {
    /// `q`
    Close,
    /// A line of digits only, 1-based across all rendered rows.
    Pick(usize),
    /// `/text` (verbatim after the slash, `/` alone clears) or any other text.
    Search(String),
    /// Blank line.
    Nothing,
}

/// Parses a picker input line (without its line terminator).
/// Digits are only ever a row number; prefix them with `/` to search for them.
pub fn parse_picker_input(line: &str) -> PickerInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return PickerInput::Nothing;
    }
    if trimmed == "q" {
        return PickerInput::Close;
    }
    if let Some(query) = line.trim_start().strip_prefix('/') {
        return PickerInput::Search(query.to_string());
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(number) = trimmed.parse::<usize>() {
            return PickerInput::Pick(number);
        }
    }
    PickerInput::Search(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_pick_and_slash_searches() {
        assert_eq!(parse_picker_input("21"), PickerInput::Pick(21));
        assert_eq!(parse_picker_input(" 3 "), PickerInput::Pick(3));
        assert_eq!(parse_picker_input("/21"), PickerInput::Search("21".into()));
        assert_eq!(parse_picker_input("/squat "), PickerInput::Search("squat ".into()));
        assert_eq!(parse_picker_input("/"), PickerInput::Search(String::new()));
    }

    #[test]
    fn close_blank_and_plain_text() {
        assert_eq!(parse_picker_input("q"), PickerInput::Close);
        assert_eq!(parse_picker_input("   "), PickerInput::Nothing);
        assert_eq!(parse_picker_input("bench"), PickerInput::Search("bench".into()));
        assert_eq!(parse_picker_input("/q"), PickerInput::Search("q".into()));
        // Too large for a row number, searched instead
        let huge = "9".repeat(40);
        assert_eq!(parse_picker_input(&huge), PickerInput::Search(huge.clone()));
    }
}
