use super::aggregate::{AggregatedReport, Cell};
use super::snapshot::ReportData;
use colored::*;

const NAME_HEADER: &str = "Agent Name";

/// Render the report as an aligned terminal table.
///
/// With `styled` the header is bold, unavailable cells are dimmed and
/// agents whose fetch failed are marked in yellow.
pub fn render_table(report: &AggregatedReport, styled: bool) -> String {
    let rows = report
        .projection()
        .map(|(row, cells)| TableRow {
            name: &row.member.name,
            failed: row.is_failed(),
            cells,
        })
        .collect();
    render(report.columns(), rows, styled)
}

/// Same layout as [`render_table`], from a serialized snapshot
pub fn render_data_table(data: &ReportData, styled: bool) -> String {
    let rows = data
        .rows
        .iter()
        .map(|row| TableRow {
            name: &row.name,
            failed: row.fetch_failed,
            cells: data
                .columns
                .iter()
                .map(|c| row.capacities.get(c).copied().unwrap_or(Cell::Unavailable))
                .collect(),
        })
        .collect();
    render(&data.columns, rows, styled)
}

struct TableRow<'a> {
    name: &'a str,
    failed: bool,
    cells: Vec<Cell>,
}

fn render(columns: &[String], rows: Vec<TableRow<'_>>, styled: bool) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or(NAME_HEADER.len());

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row.cells[i].to_string().len())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(1)
        })
        .collect();

    let mut out = String::new();

    let mut header = format!("{:<width$}", NAME_HEADER, width = name_width);
    for (column, width) in columns.iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", column, width = *width));
    }
    push_line(&mut out, &header, styled, |s| s.bold().to_string());

    let rule_len = name_width + widths.iter().map(|w| w + 2).sum::<usize>();
    push_line(&mut out, &"─".repeat(rule_len), styled, |s| s.dimmed().to_string());

    for row in &rows {
        let name = format!("{:<width$}", row.name, width = name_width);
        if styled && row.failed {
            out.push_str(&name.yellow().to_string());
        } else {
            out.push_str(&name);
        }

        for (cell, width) in row.cells.iter().zip(&widths) {
            let text = format!("{:>width$}", cell.to_string(), width = *width);
            out.push_str("  ");
            if styled && *cell == Cell::Unavailable {
                out.push_str(&text.dimmed().to_string());
            } else {
                out.push_str(&text);
            }
        }
        out.push('\n');
    }

    out
}

fn push_line(out: &mut String, line: &str, styled: bool, style: impl Fn(&str) -> String) {
    if styled {
        out.push_str(&style(line));
    } else {
        out.push_str(line);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Member, UtilizationRecord};
    use crate::report::{AgentRow, Aggregator};

    #[test]
    fn test_plain_table_layout() {
        let report = Aggregator::default().aggregate(vec![
            AgentRow::fetched(
                Member::new("u1", "Ada Lovelace"),
                UtilizationRecord::from_capacities([("voice", 1), ("chat", 12)]),
            ),
            AgentRow::failed(Member::new("u2", "Bo"), "boom"),
        ]);

        let table = render_table(&report, false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Agent Name    chat  voice");
        assert_eq!(lines[2], "Ada Lovelace    12      1");
        assert_eq!(lines[3], "Bo               -      -");
    }

    #[test]
    fn test_table_without_columns() {
        let report = Aggregator::default().aggregate(vec![AgentRow::failed(
            Member::new("u1", "Solo"),
            "boom",
        )]);

        let table = render_table(&report, false);
        assert_eq!(table.lines().next(), Some("Agent Name"));
        assert_eq!(table.lines().nth(2), Some("Solo      "));
    }

    #[test]
    fn test_snapshot_table_matches_report_table() {
        let report = Aggregator::default().aggregate(vec![
            AgentRow::fetched(
                Member::new("u1", "Ada"),
                UtilizationRecord::from_capacities([("voice", 1), ("email", 3)]),
            ),
            AgentRow::failed(Member::new("u2", "Grace"), "boom"),
        ]);
        let data = ReportData::from_report("q", &report);

        assert_eq!(render_data_table(&data, false), render_table(&report, false));
    }
}
