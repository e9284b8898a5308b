//! Report formatting utilities for terminal output

use crate::models::Money;
use crate::reports::ChartEntry;

/// Progress bar for a whole percent, e.g. `████░░░░░░`
pub fn format_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Horizontal bar scaled against `max_value`, for chart entries
pub fn format_scaled_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Chart entries as labelled bars with amounts and shares of the total
pub fn format_chart(entries: &[ChartEntry], code: &str) -> String {
    if entries.is_empty() {
        return "  (nothing recorded)\n".to_string();
    }

    let total: f64 = entries.iter().map(|e| e.value).sum();
    let max = entries.iter().map(|e| e.value).fold(0.0, f64::max);
    let label_width = entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(8, 20);

    let mut output = String::new();
    for entry in entries {
        let share = if total > 0.0 {
            entry.value / total * 100.0
        } else {
            0.0
        };
        output.push_str(&format!(
            "  {:<width$} {} {:>14} {:>5.1}%\n",
            truncate(&entry.label, label_width),
            format_scaled_bar(entry.value, max, 20),
            Money::from_decimal(entry.value).format_with_code(code),
            share,
            width = label_width
        ));
    }
    output
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to at most `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50, 10).chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(format_bar(0, 4), "░░░░");
        assert_eq!(format_bar(100, 4), "████");
    }

    #[test]
    fn test_format_chart() {
        let entries = vec![
            ChartEntry::new("Food", Money::from_minor(7500)),
            ChartEntry::new("Transport", Money::from_minor(2500)),
        ];
        let output = format_chart(&entries, "LKR");
        assert!(output.contains("75.00 LKR"));
        assert!(output.contains("25.0%"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Entertainment", 3), "...");
    }
}
