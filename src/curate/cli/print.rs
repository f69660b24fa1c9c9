use chrono::{DateTime, Utc};
use colored::Colorize;
use curate::commands::{CmdMessage, KindInfo, ListedRecord, MessageLevel};
use curate::model::Entity;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const KEY_WIDTH: usize = 10;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_records<T: Entity>(records: &[ListedRecord<T>]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    for listed in records {
        let record = &listed.record;
        let idx_str = format!("@{}. ", listed.position);

        // Pending keys print in full: they are valid locators for edit and assign
        let key_display = format!("{:<width$} ", record.id.to_string(), width = KEY_WIDTH);

        let fixed_width = 2 + idx_str.width() + key_display.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label = truncate_to_width(&record.fields.label().replace('\n', " "), available);
        let padding = available.saturating_sub(label.width());

        let key_colored = if record.id.is_pending() {
            key_display.yellow()
        } else {
            key_display.dimmed()
        };

        println!(
            "  {}{}{}{}{}",
            idx_str,
            key_colored,
            label,
            " ".repeat(padding),
            format_time_ago(record.updated_at).dimmed()
        );
    }
}

pub(super) fn print_kinds(kinds: &[KindInfo]) {
    for info in kinds {
        let name = format!("{:<16}", info.kind.to_string());
        let name = if info.stored {
            name.bold()
        } else {
            name.normal()
        };
        let nested = info
            .parent
            .map(|parent| format!(" (nested under {})", parent))
            .unwrap_or_default();
        println!("{}{}", name, nested.dimmed());
        println!("    required: {}", join_or_dash(&info.rules.required));
        println!("    search:   {}", join_or_dash(&info.rules.search));
        if let Some(slug) = &info.rules.slug {
            println!("    slug:     {} <- {}", slug.target, slug.source);
        }
    }
}

fn join_or_dash(fields: &[String]) -> String {
    if fields.is_empty() {
        "-".to_string()
    } else {
        fields.join(", ")
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
