use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use haarvi_cli::types::ScheduleResult;
use haarvi_model::ScheduleConfig;

pub fn print_summary(result: &ScheduleResult) {
    let report = &result.output.report;
    println!("Reference: {}", report.reference.now());
    println!("Export: {}", result.export_path.display());
    println!("Appointments: {}", result.appointments_path.display());
    if result.written {
        println!("Schedule: {}", result.schedule_path.display());
    } else {
        println!("Schedule: {} (dry run, not written)", result.schedule_path.display());
    }
    if !report.missing_date_columns.is_empty() {
        println!(
            "Missing date columns: {}",
            report.missing_date_columns.join(", ")
        );
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows in"),
        header_cell("Removed"),
        header_cell("Rows out"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..=3 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for stage in &report.stages {
        table.add_row(vec![
            Cell::new(stage.stage.name()),
            Cell::new(stage.rows_in),
            count_cell(stage.removed(), Color::Yellow),
            Cell::new(stage.rows_out),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.input_rows()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(report.output_rows()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if report.label_counts.is_empty() {
        println!("No participants are due this month.");
        return;
    }
    print_label_table(result);
    print_schedule_table(result);
}

fn print_label_table(result: &ScheduleResult) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Eligibility"), header_cell("Participants")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (key, count) in &result.output.report.label_counts {
        table.add_row(vec![
            Cell::new(key)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(count),
        ]);
    }
    println!("{table}");
}

/// Contact details stay out of the console; they are only in the CSV.
fn print_schedule_table(result: &ScheduleResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("PTID"),
        header_cell("Age"),
        header_cell("Appointments"),
        header_cell("Eligible"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in &result.output.rows {
        let appointments = row.appointments.entries().len();
        table.add_row(vec![
            Cell::new(&row.ptid),
            Cell::new(row.age),
            if appointments == 0 {
                dim_cell("-")
            } else {
                Cell::new(appointments)
            },
            Cell::new(row.labels().join(", ")),
        ]);
    }
    println!("{table}");
}

pub fn print_categories(config: &ScheduleConfig) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Description"),
        header_cell("Date columns"),
        header_cell("Offsets"),
    ]);
    apply_table_style(&mut table);
    for category in &config.categories {
        let offsets: Vec<String> = category.offsets.iter().map(ToString::to_string).collect();
        table.add_row(vec![
            Cell::new(category.category)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(category.category.description()),
            Cell::new(category.columns.join(", ")),
            Cell::new(offsets.join(", ")),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
