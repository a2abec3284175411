use std::path::PathBuf;

use cookfind_core::links::{html_link, recipe_url};
use cookfind_core::{Classification, Command};

use crate::action::Action;
use crate::model::results::ResultList;
use crate::model::search::SearchView;
use crate::theme::Theme;
use crate::tui_event::BackendEvent;

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Exact,
    Fuzzy,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Input => Self::Exact,
            Self::Exact => Self::Fuzzy,
            Self::Fuzzy => Self::Input,
        }
    }
}

/// Side effects the main loop performs on behalf of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Dispatch(Command),
    CopyToClipboard(String),
    OpenUrl(String),
}

/// Main application state.
pub struct App {
    pub base_url: String,
    pub focus: Focus,
    pub input: String,
    pub exact: ResultList,
    pub fuzzy: ResultList,
    pub search: SearchView,
    /// Transient feedback such as "Link copied".
    pub notice: Option<String>,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    /// Where the log file is written, shown in the help overlay.
    pub log_dir: Option<PathBuf>,
}

impl App {
    pub fn new(base_url: String, initial_query: Option<String>) -> Self {
        Self {
            base_url,
            focus: Focus::Input,
            input: initial_query.unwrap_or_default(),
            exact: ResultList::default(),
            fuzzy: ResultList::default(),
            search: SearchView::default(),
            notice: None,
            tick: 0,
            theme: Theme::kitchen(),
            should_quit: false,
            show_help: false,
            log_dir: None,
        }
    }

    fn focused_list(&mut self) -> Option<&mut ResultList> {
        match self.focus {
            Focus::Input => None,
            Focus::Exact => Some(&mut self.exact),
            Focus::Fuzzy => Some(&mut self.fuzzy),
        }
    }

    /// Process a user action and update state, returning the side effect the
    /// main loop should perform, if any.
    pub fn update(&mut self, action: Action) -> Option<Effect> {
        // When help overlay is shown, only allow a few actions through
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::ToggleHelp | Action::FocusInput => self.show_help = false,
                Action::Tick => self.tick = self.tick.wrapping_add(1),
                _ => {} // swallow everything else
            }
            return None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Search => {
                // The search button stays disabled while a search runs
                let query = self.input.trim().to_string();
                if self.search.is_running() || query.is_empty() {
                    return None;
                }
                self.notice = None;
                return Some(Effect::Dispatch(Command::StartSearch(self.input.clone())));
            }
            Action::Stop => {
                if self.search.is_running() {
                    return Some(Effect::Dispatch(Command::Cancel { purge: false }));
                }
            }
            Action::Clear => {
                self.exact.clear();
                self.fuzzy.clear();
                self.notice = None;
                return Some(Effect::Dispatch(Command::Cancel { purge: true }));
            }
            Action::InputChar(c) => {
                self.input.push(c);
            }
            Action::Backspace => {
                self.input.pop();
            }
            Action::FocusNext => {
                self.focus = self.focus.next();
            }
            Action::FocusInput => {
                self.focus = Focus::Input;
            }
            Action::MoveDown => {
                if let Some(list) = self.focused_list() {
                    list.move_down();
                }
            }
            Action::MoveUp => {
                if let Some(list) = self.focused_list() {
                    list.move_up();
                }
            }
            Action::GoTop => {
                if let Some(list) = self.focused_list() {
                    list.go_top();
                }
            }
            Action::GoBottom => {
                if let Some(list) = self.focused_list() {
                    list.go_bottom();
                }
            }
            Action::CopyLink => {
                let base_url = self.base_url.clone();
                let link = self
                    .focused_list()
                    .and_then(|l| l.selected())
                    .map(|c| html_link(&base_url, c));
                if let Some(link) = link {
                    return Some(Effect::CopyToClipboard(link));
                }
            }
            Action::OpenRecipe => {
                let base_url = self.base_url.clone();
                let url = self
                    .focused_list()
                    .and_then(|l| l.selected())
                    .map(|c| recipe_url(&base_url, &c.source_ref));
                if let Some(url) = url {
                    return Some(Effect::OpenUrl(url));
                }
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(..) | Action::None => {}
        }
        None
    }

    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::SearchStarted { query } => {
                self.search = SearchView::started(query);
            }
            BackendEvent::PageProgress {
                current_page,
                total_pages,
            } => {
                self.search.current_page = current_page;
                self.search.total_pages = total_pages;
            }
            BackendEvent::Match {
                classification,
                candidate,
            } => match classification {
                Classification::Exact => self.exact.push(candidate),
                Classification::Fuzzy => self.fuzzy.push(candidate),
                Classification::None => {}
            },
            BackendEvent::Purge => {
                self.exact.clear();
                self.fuzzy.clear();
            }
            BackendEvent::SearchFinished { state, no_results } => {
                self.search.finish(&state, no_results);
                // Ready for the next recipe name
                self.input.clear();
            }
        }
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        crate::view::search::render(f, self);

        if self.show_help {
            crate::view::help::render(f, &self.theme, self.log_dir.as_deref());
        }
    }
}
