use crate::core::data::{Note, PromptDefinition};
use crate::router::RouterSummary;
use crate::utils::format::{format_datetime, preview};
use colored::*;
use std::path::Path;

pub struct OutputStyle;

impl OutputStyle {
    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn id(text: &str) -> ColoredString {
        text.bright_yellow()
    }

    pub fn name(text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn content(text: &str) -> ColoredString {
        text.clear()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn header_separator() -> String {
        "═".repeat(50)
    }

    pub fn print_header(title: &str) {
        println!("{}", Self::title(title));
        println!("{}", Self::header_separator());
    }

    pub fn print_field_colored(label: &str, value: &str, color_fn: impl Fn(&str) -> ColoredString) {
        println!("{:>12}: {}", Self::label(label), color_fn(value));
    }

    fn note_time(note: &Note) -> String {
        note.created_at()
            .map(|dt| format_datetime(&dt))
            .unwrap_or_else(|| note.timestamp.clone())
    }

    // ========== Notes ==========

    /// One line per note: id, creation time and a content preview
    pub fn format_note_line(note: &Note) -> String {
        format!(
            "{} {} {}",
            Self::id(&format!("[{:>4}]", note.id)),
            Self::muted(&Self::note_time(note)),
            Self::content(&preview(&note.content))
        )
    }

    pub fn print_note_list(title: &str, notes: &[Note]) {
        Self::print_header(title);
        for note in notes {
            println!("{}", Self::format_note_line(note));
        }
        println!("{}", Self::separator());
        println!("{}", Self::muted(&format!("{} note(s)", notes.len())));
    }

    pub fn print_note_detailed(note: &Note) {
        println!("{}", Self::title("📝 Note Details"));
        Self::print_field_colored("ID", &note.id.to_string(), Self::id);
        Self::print_field_colored("Created", &Self::note_time(note), Self::muted);
        println!("\n{}:", Self::title("📄 Content"));
        println!("{}", Self::content(&note.content));
    }

    // ========== Prompts ==========

    pub fn print_prompt_list(prompts: &[(&str, &PromptDefinition)]) {
        Self::print_header("🧩 Prompts");
        for (name, prompt) in prompts {
            println!(
                "{} {} {}",
                Self::name(&format!("{:<12}", name)),
                Self::muted(&format!("max_tokens={:<5}", prompt.max_tokens)),
                Self::content(&preview(&prompt.template))
            );
        }
    }

    pub fn print_prompt_detailed(name: &str, prompt: &PromptDefinition) {
        println!("{}", Self::title("🧩 Prompt Details"));
        Self::print_field_colored("Name", name, Self::name);
        Self::print_field_colored("Max tokens", &prompt.max_tokens.to_string(), Self::muted);
        Self::print_field_colored("System", &prompt.system, Self::content);
        println!("\n{}:", Self::title("📄 Template"));
        println!("{}", Self::content(&prompt.template));
    }

    pub fn print_variables_list(variables: &[String]) {
        if variables.is_empty() {
            return;
        }
        println!("\n🔧 {}:", Self::header("This prompt contains variables"));
        for name in variables {
            println!("  • {}", Self::label(name));
        }
    }

    /// Backend output framed under the prompt name
    pub fn print_result(prompt_name: &str, text: &str) {
        println!("{}", Self::title(&format!("🤖 {}", prompt_name)));
        println!("{}", Self::separator());
        println!("{}", Self::content(text.trim()));
        println!("{}", Self::separator());
    }

    // ========== Configuration ==========

    pub fn print_summary(config_path: &Path, summary: &RouterSummary) {
        Self::print_header("⚙️  Configuration");
        Self::print_field_colored("Config", &config_path.display().to_string(), Self::content);
        Self::print_field_colored(
            "Valid",
            if summary.config_valid { "yes" } else { "no" },
            if summary.config_valid { Self::success } else { Self::warning },
        );
        Self::print_field_colored(
            "Database",
            &summary.database_file.display().to_string(),
            Self::content,
        );
        Self::print_field_colored(
            "Log",
            &summary.logger_file.display().to_string(),
            Self::content,
        );
        Self::print_field_colored(
            "Streaming",
            if summary.stream_enabled { "on" } else { "off" },
            Self::muted,
        );
    }
}

pub fn print_success(message: &str) {
    println!("✅ {}", OutputStyle::success(message));
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", OutputStyle::warning(message));
}

pub fn print_info(message: &str) {
    println!("💡 {}", OutputStyle::info(message));
}
