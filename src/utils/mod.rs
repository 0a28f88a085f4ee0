pub mod atomic;
pub mod error;
pub mod format;
pub mod interactive;
pub mod output;
pub mod template;

pub use interactive::*;
pub use output::{OutputStyle, print_info, print_success, print_warning};
