/// All messages that can be sent through the FLTK channel.
/// Widget callbacks send one of these; the dispatch loop in main handles them.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    Quit,

    // View
    ToggleDarkMode,

    // Highlighting
    /// The buffer was edited; arm the reclassify debounce timer.
    TextChanged,
    /// Debounce timer fired; run a full classification pass.
    Reclassify,

    // Editor events
    /// Byte position of a mouse click, for interactive-region hit tests.
    EditorClicked(i32),
    /// The user finished typing '=' on the current line.
    EqualsTyped,
    /// Renumber the ordered-list block around this zero-based line.
    RenumberList(usize),

    // Clipboard flows
    StartSequencePaste,
    StartListPaste,
    StopClipboardFlows,
    /// A paste combination was observed; recompute the clipboard.
    GlobalPaste,

    // Interactive regions
    OpenLink(String),
    RunCodeBlock(usize),
}
