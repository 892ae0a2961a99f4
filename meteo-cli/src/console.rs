use inquire::{InquireError, Select};
use meteo_core::{Table, UserInterface, table::display_cell};

/// Interactive console: arrow-key menus for choices, plain text otherwise.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl UserInterface for ConsoleUi {
    fn display_message(&self, message: &str) {
        println!("{message}");
    }

    fn display_header(&self, header: &str) {
        println!("\n--- {} ---", header.to_uppercase());
    }

    fn display_table(&self, table: &Table, max_rows: usize) {
        if table.is_empty() {
            self.display_message("No data to display.");
            return;
        }

        println!("\nData preview ({} rows in total):", table.len());
        print!("{}", render_table(&table.head(max_rows)));

        if table.len() > max_rows {
            println!("... and {} more rows.", table.len() - max_rows);
        }
    }

    fn prompt_for_choice(&self, choices: &[String], prompt: &str) -> Option<String> {
        if choices.is_empty() {
            self.display_message("No options available.");
            return None;
        }

        match Select::new(prompt, choices.to_vec()).prompt() {
            Ok(choice) => Some(choice),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                self.display_message("Selection cancelled.");
                None
            }
            Err(e) => {
                log::warn!("Prompt failed: {e}");
                None
            }
        }
    }
}

/// Left-aligned columns separated by two spaces, header underlined.
fn render_table(table: &Table) -> String {
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, table.columns().iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();

    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
