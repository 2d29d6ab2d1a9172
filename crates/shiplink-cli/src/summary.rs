use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use shiplink_common::format_numeric;
use shiplink_model::OTHER_COMPANY;

use crate::types::{CropSummary, LinkResult, ReconcileResult, ResolveResult};

pub fn print_crops(crops: &[CropSummary]) {
    println!("{}", crops_table(crops));
}

pub fn print_resolve(result: &ResolveResult) {
    println!(
        "Directory: {} parents, {} aliases ({} overlapping)",
        result.parents, result.aliases, result.overlaps
    );
    println!("{}", resolve_table(result));
    print_output(result.output.as_deref());
}

pub fn print_link(result: &LinkResult) {
    println!("{}", link_table(result));
    print_output(result.output.as_deref());
}

pub fn print_reconcile(result: &ReconcileResult) {
    if let Some(crop) = &result.crop {
        println!("Crop: {crop}");
    }
    println!("{}", reconcile_table(result));
    print_output(result.output.as_deref());
}

pub fn crops_table(crops: &[CropSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Crop"), header_cell("Commodity labels")]);
    apply_table_style(&mut table);
    for summary in crops {
        let labels = if summary.labels.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(summary.labels.join(", "))
        };
        table.add_row(vec![
            Cell::new(&summary.crop)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            labels,
        ]);
    }
    table
}

pub fn resolve_table(result: &ResolveResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Company"), header_cell("Tonnes")]);
    apply_summary_table_style(&mut table);
    let mut total = 0.0;
    for row in &result.totals {
        total += row.weight_ton;
        table.add_row(vec![
            company_cell(&row.company),
            Cell::new(format_tons(row.weight_ton)),
        ]);
    }
    table.add_row(vec![total_cell("TOTAL"), total_cell(format_tons(total))]);
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

pub fn link_table(result: &LinkResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Crop"), header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    let rows = [
        ("Left groups", result.left_groups.to_string()),
        ("Right groups", result.right_groups.to_string()),
        ("Candidate pairs", result.candidate_pairs.to_string()),
        ("Matches", result.matches.to_string()),
        ("Unique matches", result.unique_matches.to_string()),
        ("Left tonnes matched", format_tons(result.left_matched_tons)),
        ("Right tonnes matched", format_tons(result.right_matched_tons)),
    ];
    for (index, (metric, value)) in rows.into_iter().enumerate() {
        let crop = if index == 0 {
            Cell::new(&result.crop)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new("")
        };
        table.add_row(vec![crop, Cell::new(metric), Cell::new(value)]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    table
}

pub fn reconcile_table(result: &ReconcileResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Company"),
        header_cell("Tonnes"),
        header_cell("Share %"),
    ]);
    apply_summary_table_style(&mut table);
    for row in &result.rows {
        let weight = if row.weight_ton < 0.0 {
            Cell::new(format_tons(row.weight_ton))
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(format_tons(row.weight_ton))
        };
        table.add_row(vec![
            company_cell(&row.label),
            weight,
            Cell::new(format!("{:.2}", row.share_pct)),
        ]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn print_output(path: Option<&std::path::Path>) {
    if let Some(path) = path {
        println!("Wrote {}", path.display());
    }
}

fn format_tons(value: f64) -> String {
    format_numeric((value * 1000.0).round() / 1000.0)
}

fn company_cell(name: &str) -> Cell {
    if name == OTHER_COMPANY {
        dim_cell(name)
    } else {
        Cell::new(name)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn total_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
