use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::model::{Collect, Volunteer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

/// Toast-style status line, the terminal stand-in for the UI alert box.
pub fn show_alert(message: &str, kind: AlertKind, no_color: bool) {
    let tag = match kind {
        AlertKind::Success => "OK ",
        AlertKind::Error => "ERR",
        AlertKind::Info => "INF",
    };
    if no_color {
        println!("[{}] {}", tag, message);
        return;
    }
    let tag = match kind {
        AlertKind::Success => tag.bold().green(),
        AlertKind::Error => tag.bold().red(),
        AlertKind::Info => tag.bold().cyan(),
    };
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        tag,
        "]".bold().white(),
        message
    );
}

/// Spinner shown while a request is in flight.
pub fn loading_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    if let Ok(style) = ProgressStyle::with_template(":: {spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

pub fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

/// Filter choices line, mirroring the location dropdown.
pub fn show_locations(options: &[String], selected: Option<&str>) {
    if options.is_empty() {
        return;
    }
    let rendered = options
        .iter()
        .map(|loc| {
            if Some(loc.as_str()) == selected {
                format!("[{loc}]")
            } else {
                loc.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format_kv_line("Locations", &rendered);
}

pub fn render_volunteers(list: &[Volunteer]) {
    if list.is_empty() {
        println!("No volunteers found");
        return;
    }
    println!(
        "{:<6} {:<24} {:<14} {:<14} {:>7}  {}",
        "ID", "NAME", "USERNAME", "LOCATION", "POINTS", "DATE"
    );
    for v in list {
        println!(
            "{:<6} {:<24} {:<14} {:<14} {:>7}  {}",
            v.id,
            format!("{} {}", v.firstname, v.lastname),
            v.username,
            v.location.as_deref().unwrap_or("Not specified"),
            v.points,
            v.created_at.as_deref().unwrap_or("-")
        );
    }
    println!(":: {} volunteer(s)", list.len());
}

pub fn render_collects(list: &[Collect]) {
    if list.is_empty() {
        println!("No collects found");
        return;
    }
    println!(
        "{:<6} {:<20} {:>9}  {:<14} {}",
        "ID", "ITEM", "QUANTITY", "LOCATION", "DATE"
    );
    for c in list {
        println!(
            "{:<6} {:<20} {:>9}  {:<14} {}",
            c.id,
            c.item,
            c.quantity,
            c.location.as_deref().unwrap_or("Not specified"),
            c.date.as_deref().unwrap_or("-")
        );
    }
    println!(":: {} collect(s)", list.len());
}
