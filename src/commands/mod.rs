pub mod core;

pub use core::{handle_copy, handle_edit, handle_ls, handle_new, handle_rm, handle_show};
