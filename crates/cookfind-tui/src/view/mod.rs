pub mod help;
pub mod search;

const SPINNER_FRAMES: &[char] = &['◐', '◓', '◑', '◒'];

/// Spinner character for the given tick.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Shorten `s` to at most `max_width` characters, ending in "…" when cut.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    match max_width {
        0 => String::new(),
        n => {
            let mut out: String = s.chars().take(n - 1).collect();
            out.push('…');
            out
        }
    }
}
