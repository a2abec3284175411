/// Actions that the TUI can process, mapped from keyboard input or internal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Start a search for the text in the input box.
    Search,
    /// Halt the running search, keeping what is shown.
    Stop,
    /// Halt the running search and empty both result lists.
    Clear,
    InputChar(char),
    Backspace,
    FocusNext,
    FocusInput,
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    CopyLink,
    OpenRecipe,
    ToggleHelp,
    Tick,
    Resize(u16, u16),
    None,
}
