use crossterm::style::Stylize;
use std::io::IsTerminal;
use unicode_width::UnicodeWidthStr;

pub const ANSI_REGEX_PATTERN: &str = r"\x1b\[[0-9;?]*[a-zA-Z]|\x1b].*?(\x1b\\|[\x07])";

pub fn strip_ansi_codes(s: &str) -> String {
    static RE: std::sync::LazyLock<regex::Regex> =
        std::sync::LazyLock::new(|| regex::Regex::new(ANSI_REGEX_PATTERN).unwrap());
    RE.replace_all(s, "").to_string()
}

pub fn get_terminal_width() -> usize {
    static TERMINAL_WIDTH: std::sync::LazyLock<usize> = std::sync::LazyLock::new(|| {
        // 1. Check STINT_COLUMNS
        if let Ok(w) = std::env::var("STINT_COLUMNS").map(|s| s.parse().unwrap_or(0))
            && w > 0
        {
            return w;
        }

        // 2. Check COLUMNS
        if let Ok(w) = std::env::var("COLUMNS").map(|s| s.parse().unwrap_or(0))
            && w > 0
        {
            return w;
        }

        // 3. System TTY (Only called if env vars are missing)
        if is_stdout_terminal()
            && let Ok((w, _)) = crossterm::terminal::size()
        {
            return w as usize;
        }

        // 4. Default Fallback
        80
    });

    *TERMINAL_WIDTH
}

pub fn draw_panel(title: &str, lines: &[String], width: usize) {
    let inner_width = width.saturating_sub(2);
    let title_fmt = if !title.is_empty() {
        format!(" {} ", title)
    } else {
        "".to_string()
    };

    let title_width = UnicodeWidthStr::width(title_fmt.as_str());
    let total_dashes = inner_width.saturating_sub(title_width);
    let left_dashes = total_dashes / 2;
    let right_dashes = total_dashes - left_dashes;

    println!(
        "╭{}{}{}╮",
        "─".repeat(left_dashes),
        title_fmt,
        "─".repeat(right_dashes)
    );

    for line in lines {
        let stripped = strip_ansi_codes(line);
        let visible_len = UnicodeWidthStr::width(stripped.as_str());
        let total_padding = inner_width.saturating_sub(visible_len);
        let left_padding = total_padding / 2;
        let right_padding = total_padding - left_padding;

        println!(
            "│{}{}{}│",
            " ".repeat(left_padding),
            line,
            " ".repeat(right_padding)
        );
    }

    println!("╰{}╯", "─".repeat(inner_width));
}

pub fn is_stdout_terminal() -> bool {
    if std::env::var("STINT_FORCE_TTY").is_ok() {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Non-fatal problems (a single story's failed fetch, a malformed
/// timestamp) go to stderr so they never pollute piped report output.
pub fn warn(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "warning:".yellow().bold(), msg);
    } else {
        eprintln!("warning: {}", msg);
    }
}
