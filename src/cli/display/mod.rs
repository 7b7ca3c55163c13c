//! Terminal display helpers.

pub mod table;

pub use table::{list_table, render_list};
