mod categories;
mod format;
mod json;
mod overview;
mod table;

pub(crate) use categories::{output_category_json, print_category_table};
pub(crate) use format::NumberFormat;
pub(crate) use json::{output_range_json, output_today_json};
pub(crate) use overview::{output_overview_json, print_overview_table};
pub(crate) use table::{StatTableOptions, print_range_table, print_today_table};
