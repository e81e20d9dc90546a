use std::io::{self, BufRead, Write};

use anyhow::Result;

/// Reads a yes/no answer. Anything else is `None` so the caller can ask again.
pub fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Blocking confirmation for one-shot commands. `assume_yes` skips the question; anything but
/// an explicit yes counts as no.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let mut stdout = io::stdout();
    write!(stdout, "{question} [y/N] ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(parse_answer(&line).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::{confirm, parse_answer};

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer(" Y\n"), Some(true));
        assert_eq!(parse_answer("yes"), Some(true));
        assert_eq!(parse_answer("No"), Some(false));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("sure"), None);
    }

    #[test]
    fn test_confirm_assume_yes() {
        assert!(confirm("Really?", true).unwrap());
    }
}
