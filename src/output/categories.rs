use comfy_table::{Cell, Color};
use rust_decimal::Decimal;

use crate::api::CategoryRevenue;
use crate::cli::SortOrder;
use crate::core::AggregationWindow;
use crate::output::format::{
    NumberFormat, create_styled_table, format_money, header_cell, right_cell, styled_cell,
    to_pretty_json,
};

/// Sort by revenue; ties keep category order
fn sorted_by_revenue(rows: &[CategoryRevenue], order: SortOrder) -> Vec<&CategoryRevenue> {
    let mut sorted: Vec<&CategoryRevenue> = rows.iter().collect();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| a.revenue.cmp(&b.revenue)),
        SortOrder::Desc => sorted.sort_by(|a, b| b.revenue.cmp(&a.revenue)),
    }
    sorted
}

pub(crate) fn print_category_table(
    rows: &[CategoryRevenue],
    window: AggregationWindow,
    order: SortOrder,
    use_color: bool,
    number_format: NumberFormat,
) {
    let c = use_color;
    let green = if c { Some(Color::Green) } else { None };
    let cyan = if c { Some(Color::Cyan) } else { None };

    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Category", c), header_cell("Revenue", c)]);

    let mut total = Decimal::ZERO;
    for row in sorted_by_revenue(rows, order) {
        total += row.revenue;
        table.add_row(vec![
            Cell::new(&row.title),
            right_cell(&format_money(row.revenue, number_format), green, false),
        ]);
    }
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&format_money(total, number_format), green, true),
    ]);

    println!("\n  Revenue by Category ({} to {})\n", window.start, window.end);
    println!("{table}");
}

pub(crate) fn output_category_json(rows: &[CategoryRevenue], order: SortOrder) -> String {
    to_pretty_json(&sorted_by_revenue(rows, order), "[]")
}
