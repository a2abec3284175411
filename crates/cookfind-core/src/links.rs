//! Turning a candidate's source reference into something a user can use:
//! a full recipe URL, an HTML link for the clipboard, or a browser window.

use std::process::{Command, Stdio};

use crate::CoreError;
use crate::session::Candidate;
use crate::source::SourceRef;

/// Absolute URL of a recipe. References that are already absolute are
/// returned unchanged.
pub fn recipe_url(base_url: &str, source_ref: &SourceRef) -> String {
    let path = source_ref.as_str();
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// `<a href="…">Name</a>` for a candidate, the form copied to the clipboard.
pub fn html_link(base_url: &str, candidate: &Candidate) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape_html(&recipe_url(base_url, &candidate.source_ref)),
        escape_html(&candidate.display_name)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Open `url` with the platform's default handler. Does not wait for the
/// browser to exit.
pub fn open_in_browser(url: &str) -> Result<(), CoreError> {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    log::info!("Opened {url}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, path: &str) -> Candidate {
        Candidate {
            display_name: name.to_string(),
            page_index: 1,
            source_ref: SourceRef::new(path),
        }
    }

    #[test]
    fn url_joins_base_and_path() {
        let r = SourceRef::new("/recipes/1-pad-thai");
        assert_eq!(
            recipe_url("https://cooking.nytimes.com", &r),
            "https://cooking.nytimes.com/recipes/1-pad-thai"
        );
        assert_eq!(
            recipe_url("https://cooking.nytimes.com/", &r),
            "https://cooking.nytimes.com/recipes/1-pad-thai"
        );
        assert_eq!(
            recipe_url("https://cooking.nytimes.com", &SourceRef::new("recipes/2")),
            "https://cooking.nytimes.com/recipes/2"
        );
    }

    #[test]
    fn absolute_reference_untouched() {
        let r = SourceRef::new("https://example.org/r/1");
        assert_eq!(recipe_url("https://cooking.nytimes.com", &r), "https://example.org/r/1");
    }

    #[test]
    fn link_is_escaped() {
        let c = candidate("Mac & Cheese <Best>", "/recipes/3?a=1&b=2");
        assert_eq!(
            html_link("https://cooking.nytimes.com", &c),
            "<a href=\"https://cooking.nytimes.com/recipes/3?a=1&amp;b=2\">Mac &amp; Cheese &lt;Best&gt;</a>"
        );
    }
}
