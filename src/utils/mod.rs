pub(crate) mod date;
pub(crate) mod timezone;

pub(crate) use date::{backend_end_of_day, backend_start_of_day, parse_date, parse_wire_date};
pub(crate) use timezone::Timezone;
