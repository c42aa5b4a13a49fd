//! Output formatting and exit statuses for the command-line tool.

mod response;

pub use response::{exit_status, format_error, format_split, process_exit_status};
