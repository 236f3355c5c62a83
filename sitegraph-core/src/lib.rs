pub mod config;
pub mod crawl;
pub mod export;

use colored::Colorize;

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "sitegraph".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}", "same-origin site crawler".bright_black());
    eprintln!();
}
