pub mod completion;
pub mod config;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "present".bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
