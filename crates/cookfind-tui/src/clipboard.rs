//! Clipboard writes over the terminal via OSC 52.
//!
//! Works over SSH and inside tmux without a native clipboard library; the
//! terminal emulator does the actual copy.

use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const OSC52_PREFIX: &str = "\x1b]52;c;";
const OSC52_SUFFIX: &str = "\x07";

// tmux needs the sequence wrapped in a DCS passthrough
const TMUX_PREFIX: &str = "\x1bPtmux;\x1b\x1b]52;c;";
const TMUX_SUFFIX: &str = "\x07\x1b\\";

/// Build the escape sequence that places `text` on the clipboard.
pub fn osc52_sequence(text: &str, in_tmux: bool) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    if in_tmux {
        format!("{TMUX_PREFIX}{encoded}{TMUX_SUFFIX}")
    } else {
        format!("{OSC52_PREFIX}{encoded}{OSC52_SUFFIX}")
    }
}

/// Copy `text` to the system clipboard through the controlling terminal.
pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let in_tmux = std::env::var_os("TMUX").is_some();
    let mut out = io::stdout();
    out.write_all(osc52_sequence(text, in_tmux).as_bytes())?;
    out.flush()
}
