mod maths_utils;
mod perf;
mod time_utils;

pub use time_utils::{AppInstant, parse_date_label};

pub use maths_utils::{direction_of, percentile_linear, round_to};
