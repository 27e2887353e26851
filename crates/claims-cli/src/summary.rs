use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use claims_cli::pipeline::IngestReport;
use claims_model::FraudCategory;
use claims_store::{ClaimPage, ClaimRow, Dashboard, IngestRun};

pub fn print_ingest_report(report: &IngestReport) {
    println!("Input: {}", report.input.display());
    println!("Database: {}", report.database.display());
    println!("SHA-256: {}", report.input_sha256);
    if report.unchanged_input {
        println!("Input unchanged since the previous run.");
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Result"), header_cell("Time")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let timings = &report.timings;
    table.add_row(vec![
        stage_cell("Load"),
        Cell::new(format!("{} rows", report.rows)),
        dim_cell(format!("{} ms", timings.load.as_millis())),
    ]);
    table.add_row(vec![
        stage_cell("Clean"),
        Cell::new(format!(
            "{} bad amounts, {} bad dates, {} without diagnosis",
            report.amount_failures, report.date_failures, report.missing_diagnosis
        )),
        dim_cell(format!("{} ms", timings.clean.as_millis())),
    ]);
    table.add_row(vec![
        stage_cell("Aggregate"),
        Cell::new(format!("{} diagnosis baselines", report.baselines)),
        dim_cell(format!("{} ms", timings.aggregate.as_millis())),
    ]);
    table.add_row(vec![
        stage_cell("Score"),
        Cell::new(format!("{} scored", report.rows)),
        dim_cell(format!("{} ms", timings.score.as_millis())),
    ]);
    table.add_row(vec![
        stage_cell("Persist"),
        Cell::new(format!("{} stored", report.rows)),
        dim_cell(format!("{} ms", timings.persist.as_millis())),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(format!("{} ms", timings.total().as_millis())).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut categories = Table::new();
    categories.set_header(vec![header_cell("Category"), header_cell("Claims")]);
    apply_table_style(&mut categories);
    align_column(&mut categories, 1, CellAlignment::Right);
    for (category, count) in &report.categories {
        categories.add_row(vec![category_cell(*category), count_cell(*count as u64)]);
    }
    println!("{categories}");
}

pub fn print_claim_page(page: &ClaimPage) {
    if page.claims.is_empty() {
        println!("No claims match.");
    } else {
        println!("{}", claims_table(&page.claims));
    }
    println!(
        "page {} of {} ({} claims)",
        page.page,
        page.pages.max(1),
        page.total
    );
}

pub fn print_dashboard(dashboard: &Dashboard, last_run: Option<&IngestRun>) {
    if let Some(run) = last_run {
        println!(
            "Loaded from {} at {}",
            run.source_path,
            run.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    let mut totals = Table::new();
    apply_table_style(&mut totals);
    align_column(&mut totals, 1, CellAlignment::Right);
    totals.add_row(vec![header_cell("Total claims"), Cell::new(dashboard.total_claims)]);
    totals.add_row(vec![
        header_cell("Average amount"),
        Cell::new(format!("{:.2}", dashboard.avg_amount)),
    ]);
    totals.add_row(vec![
        header_cell("High risk"),
        Cell::new(dashboard.high_count).fg(Color::Red),
    ]);
    totals.add_row(vec![
        header_cell("Flagged"),
        Cell::new(format!("{:.2}%", dashboard.pct_flagged)),
    ]);
    println!("{totals}");

    let mut distribution = Table::new();
    distribution.set_header(vec![header_cell("Category"), header_cell("Claims")]);
    apply_table_style(&mut distribution);
    align_column(&mut distribution, 1, CellAlignment::Right);
    for (category, count) in &dashboard.distribution {
        distribution.add_row(vec![category_cell(*category), count_cell(*count)]);
    }
    println!("{distribution}");

    if !dashboard.top.is_empty() {
        println!();
        println!("Most suspicious:");
        println!("{}", claims_table(&dashboard.top));
    }
}

fn claims_table(rows: &[ClaimRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("S/N"),
        header_cell("Gender"),
        header_cell("Diagnosis"),
        header_cell("Amount"),
        header_cell("Baseline"),
        header_cell("Stay"),
        header_cell("Score"),
        header_cell("Risk"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [0, 4, 5, 6, 7] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            dim_cell(row.id),
            Cell::new(&row.sn),
            optional_cell(row.gender.as_deref()),
            optional_cell(row.diagnosis.as_deref().map(str::trim)),
            amount_cell(row.amount),
            amount_cell(row.diag_avg),
            Cell::new(row.los),
            Cell::new(row.fraud_score).add_attribute(Attribute::Bold),
            category_cell(row.fraud_category),
        ]);
    }
    table
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn category_cell(category: FraudCategory) -> Cell {
    let cell = Cell::new(category);
    match category {
        FraudCategory::Low => cell.fg(Color::Green),
        FraudCategory::Medium => cell.fg(Color::Yellow),
        FraudCategory::High => cell.fg(Color::Red).add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: u64) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn amount_cell(amount: Option<f64>) -> Cell {
    match amount {
        Some(value) => Cell::new(format!("{value:.2}")),
        None => dim_cell("-"),
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) if !text.is_empty() => Cell::new(text),
        _ => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
