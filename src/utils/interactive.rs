use crate::utils::error::{AppError, AppResult};
use std::io::{self, BufRead, Write};

/// Print `prompt` and read one trimmed line from stdin
pub fn prompt_input(prompt: &str) -> AppResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().lock().read_line(&mut input)?;
    if read == 0 {
        return Err(AppError::Io("stdin closed".to_string()));
    }

    Ok(input.trim().to_string())
}

/// Parse a yes/no answer, an empty answer taking `default`
pub fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        "" => Some(default),
        _ => None,
    }
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> AppResult<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        let input = prompt_input(&format!("{} {}: ", prompt, hint))?;
        match parse_yes_no(&input, default) {
            Some(answer) => return Ok(answer),
            None => println!("Please enter 'y' or 'n'"),
        }
    }
}

/// Ask for confirmation unless `assume_yes` is set. A closed stdin counts as no.
pub fn confirm(prompt: &str, default: bool, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    prompt_yes_no(prompt, default).unwrap_or(false)
}
