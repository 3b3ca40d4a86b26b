//! Output formatting utilities

use console::{style, Style};
use whatsnew_core::{Category, ExtractedItem};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for versions and tags
pub fn tag_style() -> Style {
    Style::new().yellow()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Print categories as a markdown-like list
pub fn print_categories(categories: &[Category]) {
    for (i, category) in categories.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            style(&category.title).bold().underlined(),
            style(format!("({})", category.items.len())).dim()
        );
        for item in &category.items {
            println!("  - {}", item_line(item));
        }
    }
}

/// Render one item: scope, text, then references
fn item_line(item: &ExtractedItem) -> String {
    let mut line = String::new();
    if let Some(scope) = &item.scope {
        line.push_str(&format!("{} ", style(format!("{}:", scope)).bold()));
    }
    line.push_str(&item.text);
    if !item.refs.is_empty() {
        let refs: Vec<String> = item.refs.iter().map(|r| format_ref(r)).collect();
        line.push_str(&format!(" {}", style(format!("({})", refs.join(", "))).dim()));
    }
    line
}

/// Numbers get a `#`, merge requests (`!12`) and SHAs stay as they are
fn format_ref(reference: &str) -> String {
    if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
        format!("#{}", reference)
    } else {
        reference.to_string()
    }
}
