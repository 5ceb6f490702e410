use comfy_table::{presets, ContentArrangement, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Spaces between adjacent columns.
const COLUMN_GAP: u16 = 2;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Rule listing with one line per rule and a header line on top.
///
/// Cells in a column given a limit via [`RuleTable::limit`] are shortened
/// with a trailing `...`.
pub struct RuleTable {
    table: Table,
    limits: Vec<Option<usize>>,
    rows: usize,
}

impl RuleTable {
    pub fn new(headers: &[&str]) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(headers.to_vec());

        for col in table.column_iter_mut() {
            col.set_padding((0, COLUMN_GAP));
        }

        Self {
            table,
            limits: vec![None; headers.len()],
            rows: 0,
        }
    }

    /// Caps cells in `column` at `max` characters.
    #[must_use]
    pub fn limit(mut self, column: usize, max: usize) -> Self {
        if let Some(slot) = self.limits.get_mut(column) {
            *slot = Some(max);
        }
        self
    }

    pub fn push<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                let cell = cell.into();
                match self.limits.get(i).copied().flatten() {
                    Some(max) => shorten(&cell, max),
                    None => cell,
                }
            })
            .collect();
        self.table.add_row(row);
        self.rows += 1;
    }

    /// The rendered table, or `None` when no rows were pushed.
    pub fn render(&self) -> Option<String> {
        if self.rows == 0 {
            return None;
        }
        let text = self.table.to_string();
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        Some(lines.join("\n"))
    }

    /// Prints the table, or `empty` when there is nothing to list.
    pub fn print_or(&self, empty: &str) {
        match self.render() {
            Some(text) => println!("{text}"),
            None => println!("{empty}"),
        }
    }
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_keeps_short_text() {
        assert_eq!(shorten("[1,2]", 10), "[1,2]");
        assert_eq!(shorten("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert!(RuleTable::new(&["Owner", "Status"]).render().is_none());
    }

    #[test]
    fn limited_column_is_shortened() {
        let mut table = RuleTable::new(&["Owner", "Value"]).limit(1, 8);
        table.push(["svc.Store.getCount", "[1,2,3,4,5,6]"]);
        table.push(["svc.Store.getName", "\"a\""]);

        let text = table.render().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Owner"));
        assert!(lines[1].starts_with("svc.Store.getCount"));
        assert!(lines[1].ends_with("[1,2,..."));
        assert!(lines.iter().all(|line| !line.ends_with(' ')));
    }
}
