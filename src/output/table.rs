use comfy_table::{Cell, Color, Table};

use crate::cli::SortOrder;
use crate::consts::AGGREGATION_DAYS;
use crate::core::{DailyStat, ReconciliationResult, StatSource};
use crate::output::format::{
    NumberFormat, create_styled_table, format_money, format_number, header_cell, right_cell,
    styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct StatTableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
}

fn today_title(result: &ReconciliationResult) -> String {
    match result.source {
        StatSource::Today | StatSource::Empty => format!("Sales for {}", result.stat.date),
        StatSource::AggregatedRange => format!(
            "Sales for the {} days ending {}",
            AGGREGATION_DAYS, result.stat.date
        ),
    }
}

fn metric_rows(stat: &DailyStat, nf: NumberFormat) -> [(&'static str, String); 7] {
    [
        ("Revenue", format_money(stat.daily_revenue, nf)),
        ("Orders", format_number(stat.total_orders, nf)),
        ("Completed", format_number(stat.completed_orders, nf)),
        ("Cancelled", format_number(stat.cancelled_orders, nf)),
        ("Avg Order Value", format_money(stat.average_order_value, nf)),
        ("Products", format_number(stat.total_products, nf)),
        ("Customers", format_number(stat.total_customers, nf)),
    ]
}

fn build_today_table(result: &ReconciliationResult, options: StatTableOptions) -> Table {
    let c = options.use_color;
    let green = if c { Some(Color::Green) } else { None };

    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Metric", c), header_cell("Value", c)]);
    for (label, value) in metric_rows(&result.stat, options.number_format) {
        let color = if label == "Revenue" { green } else { None };
        table.add_row(vec![Cell::new(label), right_cell(&value, color, false)]);
    }
    table
}

pub(crate) fn print_today_table(result: &ReconciliationResult, options: StatTableOptions) {
    let table = build_today_table(result, options);
    println!("\n  {}\n", today_title(result));
    println!("{table}");
    if let Some(message) = result.source.message() {
        if options.use_color {
            let color = match result.source {
                StatSource::Empty => "33",
                _ => "36",
            };
            println!("\n  \x1b[{color}m{message}\x1b[0m\n");
        } else {
            println!("\n  {message}\n");
        }
    }
}

pub(super) fn sorted_days(days: &[DailyStat], order: SortOrder) -> Vec<&DailyStat> {
    let mut sorted: Vec<&DailyStat> = days.iter().collect();
    match order {
        SortOrder::Asc => sorted.sort_by_key(|d| d.date),
        SortOrder::Desc => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
    }
    sorted
}

fn range_row(label: Cell, stat: &DailyStat, nf: NumberFormat, color: Option<Color>, bold: bool) -> Vec<Cell> {
    vec![
        label,
        right_cell(&format_money(stat.daily_revenue, nf), color, bold),
        right_cell(&format_number(stat.total_orders, nf), color, bold),
        right_cell(&format_number(stat.completed_orders, nf), color, bold),
        right_cell(&format_number(stat.cancelled_orders, nf), color, bold),
        right_cell(&format_money(stat.average_order_value, nf), color, bold),
        right_cell(&format_number(stat.total_products, nf), color, bold),
        right_cell(&format_number(stat.total_customers, nf), color, bold),
    ]
}

fn build_range_table(days: &[DailyStat], total: &DailyStat, options: StatTableOptions) -> Table {
    let c = options.use_color;
    let nf = options.number_format;
    let cyan = if c { Some(Color::Cyan) } else { None };

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Date", c),
        header_cell("Revenue", c),
        header_cell("Orders", c),
        header_cell("Completed", c),
        header_cell("Cancelled", c),
        header_cell("Avg Order", c),
        header_cell("Products", c),
        header_cell("Customers", c),
    ]);

    for day in sorted_days(days, options.order) {
        let label = Cell::new(day.date.to_string());
        table.add_row(range_row(label, day, nf, None, false));
    }
    table.add_row(range_row(styled_cell("TOTAL", cyan, true), total, nf, cyan, true));
    table
}

pub(crate) fn print_range_table(days: &[DailyStat], total: &DailyStat, options: StatTableOptions) {
    let table = build_range_table(days, total, options);
    println!("\n  Daily Sales\n");
    println!("{table}");
    println!(
        "\n  {} days with data\n",
        format_number(days.len() as i64, options.number_format)
    );
}
