use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use cookfind_core::links::{html_link, recipe_url};
use cookfind_core::{Candidate, Classification, PaginationState, ProgressReporter, ResultSink};

/// Prints matches to stdout as they stream in, above the progress bar.
pub struct PrintSink {
    pub bar: ProgressBar,
    pub base_url: String,
    pub color: bool,
    pub links: bool,
    pub quiet: bool,
}

impl PrintSink {
    pub fn format_match(&self, classification: Classification, candidate: &Candidate) -> String {
        let tag = match classification {
            Classification::Exact => "EXACT",
            Classification::Fuzzy => "FUZZY",
            Classification::None => "     ",
        };
        let tag = if !self.color {
            tag.to_string()
        } else if classification == Classification::Exact {
            tag.green().bold().to_string()
        } else {
            tag.yellow().to_string()
        };

        let target = if self.links {
            html_link(&self.base_url, candidate)
        } else {
            recipe_url(&self.base_url, &candidate.source_ref)
        };
        let target = if self.color {
            target.dimmed().to_string()
        } else {
            target
        };

        format!(
            "{tag}  {}  (page {})  {target}",
            candidate.display_name, candidate.page_index
        )
    }
}

impl ResultSink for PrintSink {
    fn on_match(&mut self, classification: Classification, candidate: &Candidate) {
        if self.quiet {
            return;
        }
        let line = self.format_match(classification, candidate);
        self.bar.suspend(|| println!("{line}"));
    }
}

/// Drives an indicatif bar from page progress. The bar only appears once a
/// search turns out to span more than one page.
pub struct PageProgress {
    pub bar: ProgressBar,
}

impl PageProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("Searching {len} result pages... {bar:30} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl Default for PageProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for PageProgress {
    fn on_page(&mut self, current_page: u32, total_pages: u32) {
        if total_pages > 1 && self.bar.is_hidden() {
            self.bar
                .set_draw_target(indicatif::ProgressDrawTarget::stderr());
        }
        self.bar.set_length(u64::from(total_pages));
        self.bar.set_position(u64::from(current_page));
    }

    fn finished(&mut self, _state: &PaginationState) {
        self.bar.finish_and_clear();
    }
}
