/// Everything a key press can mean to the app, independent of the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Ask for quit confirmation (or confirm it when the dialog is open).
    Quit,
    /// Leave immediately, no confirmation.
    ForceQuit,
    MoveUp,
    MoveDown,
    /// Page result columns left or right.
    ColumnLeft,
    ColumnRight,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    /// Space: toggle a folder item or pick a result row.
    Toggle,
    /// Enter in normal mode.
    DrillIn,
    /// Esc in normal mode.
    NavigateBack,
    Extract,
    GenerateSummary,
    EditField,
    Download,
    Reload,
    ToggleHelp,

    // Text input mode
    InputChar(char),
    InputBackspace,
    InputNewline,
    InputConfirm,
    InputCancel,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    DeleteForward,

    Tick,
    Resize(u16, u16),
    None,
}
