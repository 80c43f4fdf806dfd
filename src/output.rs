use std::path::Path;

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::color::color_for;
use crate::types::{MonthlyAverage, MonthlyPreviewRow, SeriesBounds};
use crate::util::{format_number, month_name};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Render the first `max_rows` rows as a markdown table.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
}

pub fn monthly_preview(monthly: &[MonthlyAverage], bounds: &SeriesBounds) -> Vec<MonthlyPreviewRow> {
    monthly
        .iter()
        .map(|m| MonthlyPreviewRow {
            year: m.year,
            month: month_name(m.month, true)
                .map(str::to_string)
                .unwrap_or_else(|_| m.month.to_string()),
            index_value: format_number(m.index_value, 2),
            color: color_for(m.index_value, bounds).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MonthNameRow;

    #[test]
    fn empty_table() {
        let rows: Vec<MonthNameRow> = Vec::new();
        assert_eq!(render_table(&rows, 5), "(no rows)");
    }

    #[test]
    fn table_is_truncated() {
        let rows: Vec<MonthNameRow> = (1..=3)
            .map(|n| MonthNameRow {
                number: n,
                name: month_name(n, false).unwrap().to_string(),
            })
            .collect();
        let table = render_table(&rows, 2);
        assert!(table.contains("February"));
        assert!(!table.contains("March"));
    }

    #[test]
    fn preview_rows_carry_colors() {
        let bounds = SeriesBounds { min: -10.0, max: 10.0 };
        let rows = monthly_preview(
            &[MonthlyAverage { year: 2023, month: 7, index_value: -10.0 }],
            &bounds,
        );
        assert_eq!(rows[0].month, "Jul");
        assert_eq!(rows[0].index_value, "-10.00");
        assert_eq!(rows[0].color, "rgba(255, 70, 70, 0.8)");
    }

    #[test]
    fn writes_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monthly.csv");
        write_csv(
            &path,
            &[MonthlyAverage { year: 2023, month: 6, index_value: 1.5 }],
        )
        .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Year,Month,Index Value\n2023,6,1.5\n");
    }
}
