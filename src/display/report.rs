//! Report formatting utilities for terminal output
//!
//! Provides formatting helpers shared by the dashboard and allocation views.

/// Format a currency amount with thousands separators and two decimals
pub fn format_amount(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}.{:02}", sign, symbol, grouped, cents % 100)
}

/// Format an amount with color hints for terminal display
pub fn format_amount_colored(amount: f64, symbol: &str) -> String {
    let text = format_amount(amount, symbol);
    if amount < 0.0 {
        format!("\x1b[31m{}\x1b[0m", text) // Red for negative
    } else if amount > 0.0 {
        format!("\x1b[32m{}\x1b[0m", text) // Green for positive
    } else {
        text
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Format a signed period-over-period change
pub fn format_change(pct: f64) -> String {
    if pct > 0.0 {
        format!("▲ {:.1}%", pct)
    } else if pct < 0.0 {
        format!("▼ {:.1}%", pct.abs())
    } else {
        "= 0.0%".to_string()
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
