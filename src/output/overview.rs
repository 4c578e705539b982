use comfy_table::Cell;

use crate::api::Overview;
use crate::output::format::{
    NumberFormat, create_styled_table, format_number, header_cell, right_cell, to_pretty_json,
};

pub(crate) fn print_overview_table(overview: &Overview, use_color: bool, number_format: NumberFormat) {
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Store", use_color), header_cell("Count", use_color)]);
    let rows = [
        ("Products", overview.total_products),
        ("Categories", overview.total_categories),
        ("Orders", overview.total_orders),
        ("Users", overview.total_users),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label),
            right_cell(&format_number(value, number_format), None, false),
        ]);
    }

    println!("\n  Store Overview\n");
    println!("{table}");
}

pub(crate) fn output_overview_json(overview: &Overview) -> String {
    to_pretty_json(overview, "{}")
}
