use crate::models::PropertyRecord;
use crate::results::loader::LoadState;
use crate::results::selection::Selection;
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub const EMPTY_STATE_TEXT: &str = "No properties found matching your search criteria";

const HEADERS: [&str; 10] = [
    "",
    "Address",
    "Sale Date",
    "Cap Rate",
    "Price Per Unit",
    "Number of Units",
    "Year Built",
    "Property Type",
    "Total Square Feet",
    "ID",
];

/// Plain-text view of the results screen
pub fn render(state: &LoadState, selection: &Selection) -> String {
    let mut out = String::new();

    match state {
        LoadState::Loading => out.push_str("Loading...\n"),
        LoadState::Error(message) => {
            out.push_str("Search Results\n\n");
            let _ = writeln!(out, "Error\n{}", message);
        }
        LoadState::Empty => {
            out.push_str("Search Results    0 properties found\n\n");
            let _ = writeln!(out, "{}", EMPTY_STATE_TEXT);
        }
        LoadState::Success(records) => {
            let _ = writeln!(out, "Search Results    {} properties found\n", records.len());
            out.push_str(&render_table(records, selection));
            if let Some(action) = selection.report_action() {
                let _ = writeln!(out, "\n{}", action.label());
            }
        }
    }

    out
}

/// One row per record, in the order given
pub fn render_table(records: &[PropertyRecord], selection: &Selection) -> String {
    let rows: Vec<[String; 10]> = records.iter().map(|r| row(r, selection.contains(&r.id))).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        write_line(&mut out, row, &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[String; 10], widths: &[usize; 10]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

fn row(record: &PropertyRecord, selected: bool) -> [String; 10] {
    [
        if selected { "[x]" } else { "[ ]" }.to_string(),
        record.address.clone(),
        format_sale_date(record.sale_date),
        format!("{:.2}%", record.actual_cap_rate),
        format!("${}", format_grouped(record.price_per_unit)),
        record.number_of_units.to_string(),
        record.year_built.to_string(),
        record.property_type.clone(),
        format_grouped(record.total_square_feet),
        record.id.clone(),
    ]
}

/// Medium date, e.g. `Jan 5, 2024`
pub fn format_sale_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Thousands separators and at most three decimals, e.g. `1,234.5`
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
