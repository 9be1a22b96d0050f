//! Tally CLI - set, evaluate, and inspect workbook cells

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_sheets::prelude::*;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Integer spreadsheet tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a cell and save the file
    Set {
        /// Workbook file (created if missing)
        file: PathBuf,

        /// Cell identifier, e.g. A1
        cell: String,

        /// Integer, text, or =formula
        value: String,

        /// Target sheet name
        #[arg(short, long, default_value = "Sheet1")]
        sheet: String,
    },

    /// Evaluate a cell and print the result
    Get {
        /// Workbook file
        file: PathBuf,

        /// Cell identifier, e.g. A1
        cell: String,

        /// Target sheet name
        #[arg(short, long, default_value = "Sheet1")]
        sheet: String,
    },

    /// Show information about a workbook
    Info {
        /// Workbook file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Set {
            file,
            cell,
            value,
            sheet,
        } => set_cell(&file, &cell, &value, &sheet),
        Commands::Get { file, cell, sheet } => get_cell(&file, &cell, &sheet),
        Commands::Info { file } => show_info(&file),
    }
}

fn set_cell(file: &PathBuf, cell: &str, value: &str, sheet: &str) -> Result<()> {
    let mut session = SheetSession::open(file, sheet)
        .with_context(|| format!("Failed to open '{}'", file.display()))?;

    // An integer literal stores as a number; everything else goes through
    // the text path, where a leading '=' marks a formula.
    let input = match value.parse::<i64>() {
        Ok(n) => CellInput::Integer(n),
        Err(_) => CellInput::Text(value.to_string()),
    };

    session
        .set_cell(cell, input)
        .with_context(|| format!("Failed to set cell {}", cell))?;
    session
        .save_in_place()
        .with_context(|| format!("Failed to save '{}'", file.display()))?;

    Ok(())
}

fn get_cell(file: &PathBuf, cell: &str, sheet: &str) -> Result<()> {
    let session = SheetSession::open(file, sheet)
        .with_context(|| format!("Failed to open '{}'", file.display()))?;

    let value = session
        .get_cell(cell)
        .with_context(|| format!("Failed to evaluate cell {}", cell))?;
    println!("{}", value);

    Ok(())
}

fn show_info(file: &PathBuf) -> Result<()> {
    let workbook =
        Workbook::open(file).with_context(|| format!("Failed to open '{}'", file.display()))?;

    println!("File: {}", file.display());
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());

        match sheet.used_bounds() {
            Some((min_row, min_col, max_row, max_col)) => {
                let top_left = CellAddress::new(min_row, min_col)?;
                let bottom_right = CellAddress::new(max_row, max_col)?;
                println!("    Used range: {}:{}", top_left, bottom_right);
            }
            None => println!("    Used range: empty"),
        }

        let formula_count = sheet
            .iter_cells()
            .filter(|(_, _, v)| v.is_formula())
            .count();
        println!("    Cells: {}", sheet.cell_count());
        println!("    Formulas: {}", formula_count);
    }

    Ok(())
}
