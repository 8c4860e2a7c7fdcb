//! Table formatting for CLI list output
//!
//! Rows are built from a record's fields through its schema, so one
//! formatter serves every entity type.

use console::{style, StyledObject};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_md, escape_tsv, format_short_id_str, truncate_str};
use crate::cli::OutputFormat;
use crate::core::record::Record;
use crate::core::value::Value;
use crate::schema::record::RecordSchema;

/// Widest a text column may grow in the terminal table
const MAX_TEXT_WIDTH: usize = 40;

/// Plain text of a cell; missing values render as "-"
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None => "-".to_string(),
        Some(Value::Timestamp(ts)) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Some(v) => v.as_match_string(),
    }
}

/// Colour for well-known tag values
fn style_tag(text: &str) -> StyledObject<&str> {
    match text {
        "critical" | "blocked" => style(text).red().bold(),
        "high" | "review" => style(text).yellow(),
        "done" | "signed_off" => style(text).green(),
        "in_progress" => style(text).cyan(),
        "low" | "todo" | "prospecting" => style(text).dim(),
        _ => style(text),
    }
}

/// Schema-driven table formatter
pub struct TableFormatter<'a> {
    schema: &'a RecordSchema,
    columns: Vec<&'a str>,
}

impl<'a> TableFormatter<'a> {
    /// Columns must be fields of the schema; unknown names are dropped
    pub fn new(schema: &'a RecordSchema, columns: &[&'a str]) -> Self {
        let columns = columns
            .iter()
            .copied()
            .filter(|c| schema.field(c).is_some())
            .collect();
        Self { schema, columns }
    }

    fn header(&self, column: &str) -> String {
        self.schema
            .field(column)
            .map(|f| f.label.clone())
            .unwrap_or_else(|| column.to_string())
    }

    fn row<R: Record>(&self, record: &R) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| cell_text(record.field(c).as_ref()))
            .collect()
    }

    /// Print records in a tabular format; returns false for formats the
    /// caller must serialize itself (json, yaml)
    pub fn output<R: Record>(&self, records: &[&R], format: OutputFormat, total: usize) -> bool {
        match format {
            OutputFormat::Auto => self.output_terminal(records, total),
            OutputFormat::Tsv => self.output_tsv(records),
            OutputFormat::Md => self.output_md(records),
            OutputFormat::Id => {
                for record in records {
                    println!("{}", record.key());
                }
            }
            OutputFormat::Json | OutputFormat::Yaml => return false,
        }
        true
    }

    fn output_tsv<R: Record>(&self, records: &[&R]) {
        println!("{}", self.columns.join("\t"));
        for record in records {
            let row: Vec<String> = self.row(*record).iter().map(|c| escape_tsv(c)).collect();
            println!("{}", row.join("\t"));
        }
    }

    fn output_md<R: Record>(&self, records: &[&R]) {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| self.header(c)));
        for record in records {
            builder.push_record(self.row(*record).iter().map(|c| escape_md(c)));
        }
        let mut table = builder.build();
        table.with(Style::markdown());
        println!("{}", table);
    }

    fn output_terminal<R: Record>(&self, records: &[&R], total: usize) {
        let entity = self.schema.entity();
        if records.is_empty() {
            println!("No {} records found.", entity);
            return;
        }

        let key_field = self.schema.key_field();
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                self.columns
                    .iter()
                    .zip(self.row(*r))
                    .map(|(c, text)| {
                        if *c == key_field {
                            format_short_id_str(&text)
                        } else {
                            truncate_str(&text, MAX_TEXT_WIDTH)
                        }
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                rows.iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(c.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", style(c.to_uppercase()).bold(), w = w))
            .collect();
        println!("{}", header.join("  "));
        println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len()));

        for row in &rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(row.iter().zip(&widths))
                .map(|(c, (text, w))| {
                    let is_tag = self
                        .schema
                        .field(c)
                        .is_some_and(|f| f.kind.is_tag());
                    if *c == key_field {
                        format!("{:<w$}", style(text).cyan(), w = w)
                    } else if is_tag {
                        format!("{:<w$}", style_tag(text), w = w)
                    } else {
                        format!("{:<w$}", text, w = w)
                    }
                })
                .collect();
            println!("{}", cells.join("  ").trim_end());
        }

        println!();
        println!(
            "{} of {} {} record(s)",
            style(records.len()).cyan(),
            total,
            entity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "-");
        assert_eq!(cell_text(Some(&Value::Number(12.0))), "12");
        assert_eq!(
            cell_text(Some(&Value::Date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()))),
            "2025-03-31"
        );
        assert_eq!(cell_text(Some(&Value::Tag("in_progress".into()))), "in_progress");
    }
}
