use std::fmt::Write;

use anyhow::{Result, bail};

/// Render `score * 100` with two decimals, e.g. `0.1234` -> `"12.34"`.
///
/// Exact half-cent ties round away from zero, as JavaScript's `toFixed(2)` does.
pub fn percentage(score: f64) -> String {
    let value = score * 100.0;
    if value == 0.0 {
        return "0.00".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // An exact tie at the third decimal is an odd number of eighths.
    let eighths = value.abs() * 8.0;
    if eighths.fract() == 0.0 && eighths < 2f64.powi(53) && (eighths as u64) % 2 == 1 {
        let cents = (eighths as u128 * 25 + 1) / 2;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{}.{:02}", cents / 100, cents % 100);
    }
    format!("{value:.2}")
}

/// Pairs each compared text with its score. `texts` and `scores` must line up.
pub fn format_report(query: &str, texts: &[String], scores: &[f64]) -> Result<String> {
    if texts.len() != scores.len() {
        bail!(
            "Cannot pair {} texts with {} scores",
            texts.len(),
            scores.len()
        );
    }

    let mut out = String::new();
    out.push_str("\n=== Similarity Results ===\n");
    writeln!(out, "Query: \"{query}\"\n")?;
    for (text, score) in texts.iter().zip(scores) {
        writeln!(out, "Compared to: \"{text}\"")?;
        writeln!(out, "Similarity: {}%\n", percentage(*score))?;
    }
    Ok(out)
}
