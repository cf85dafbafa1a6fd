//! Terminal output formatting.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use unicode_width::UnicodeWidthStr;

use marketscope_core::MarketAnalysisResult;
use marketscope_llm::BackendStatus;
use marketscope_report::{GeneratedReport, ReportInfo};

const NAME_WIDTH: usize = 24;

/// Spinner shown while a long step runs.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

/// Human-readable byte size.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

/// Print the per-product comparison table and the leaders.
pub fn print_comparison(result: &MarketAnalysisResult) {
    println!();
    println!(
        "{} {}",
        "Market study:".cyan().bold(),
        format!("{} ({})", result.sector, result.analysis_date).bold()
    );
    println!();
    println!(
        "{} {:>8} {:>9} {:>13} {:>8}",
        pad_right("Product", NAME_WIDTH),
        "Share",
        "Price",
        "Satisfaction",
        "Growth"
    );
    println!("{}", "─".repeat(NAME_WIDTH + 42));

    for product in &result.products {
        let growth = format!("{:>+7.1}%", product.growth);
        let growth = if product.growth > 0.0 { growth.green() } else { growth.red() };
        println!(
            "{} {:>7.1}% {:>9.0} {:>11.1}/5 {}",
            pad_right(&truncate_visual(&product.name, NAME_WIDTH), NAME_WIDTH),
            product.market_share,
            product.price,
            product.satisfaction,
            growth
        );
    }

    let stats = result.stats();
    println!();
    if let Some(leader) = &stats.share_leader {
        println!("  {} {} ({:.1}%)", "Market leader:".bold(), leader.name, leader.value);
    }
    if let Some(leader) = &stats.satisfaction_leader {
        println!("  {} {} ({:.1}/5)", "Best satisfaction:".bold(), leader.name, leader.value);
    }
    if let Some(leader) = &stats.growth_leader {
        println!("  {} {} ({:+.1}%)", "Strongest growth:".bold(), leader.name, leader.value);
    }

    println!();
    println!("{}", "Recommendations".bold());
    for (i, recommendation) in result.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, recommendation);
    }
}

pub fn print_generated(report: &GeneratedReport) {
    println!();
    println!(
        "{} {} {}",
        "✓".green().bold(),
        "Report written to".bold(),
        report.path.display()
    );
    println!(
        "  {} · {} chart(s) rendered",
        format_size(report.size).dimmed(),
        report.charts_rendered
    );
}

/// Print stored reports as a table.
pub fn print_reports_table(reports: &[ReportInfo]) {
    if reports.is_empty() {
        println!("{}", "No reports found.".dimmed());
        return;
    }

    println!("{} {:>10}  {}", pad_right("File", 56), "Size", "Created");
    println!("{}", "─".repeat(96));
    for report in reports {
        println!(
            "{} {:>10}  {}",
            pad_right(&report.filename, 56),
            format_size(report.size),
            report.created.dimmed()
        );
    }

    println!();
    println!("{} report(s) total", reports.len());
}

pub fn print_backend_status(status: &BackendStatus, host: &str) {
    let reachable = if status.reachable { "reachable".green() } else { "unreachable".red() };
    let model = if status.model_available { "installed".green() } else { "missing".yellow() };

    println!("{}: {} ({})", "Backend".bold(), host, reachable);
    println!("{}: {} ({})", "Model".bold(), status.model, model);
    if status.reachable {
        println!("{}: {}", "Installed models".bold(), status.models.len());
    }
    if !status.is_ready() {
        println!();
        println!("{}", "Backend mode will fall back to the simulation.".dimmed());
    }
}

pub fn print_models(models: &[String], configured: &str) {
    if models.is_empty() {
        println!("{}", "No models found (is the backend running?).".dimmed());
        return;
    }
    for model in models {
        if model == configured || model.strip_suffix(":latest") == Some(configured) {
            println!("  {} {}", model.cyan().bold(), "(configured)".dimmed());
        } else {
            println!("  {}", model);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_and_truncate() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("abcdef", 4), "abcdef");
        assert_eq!(truncate_visual("short", 10), "short");
        assert_eq!(truncate_visual("a very long product name", 10), "a very l..");
        let truncated = truncate_visual("日本語の製品名です", 8);
        assert_eq!(UnicodeWidthStr::width(truncated.as_str()), 8);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
