use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::messages::Message;

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>) {
    let add = |menu: &mut MenuBar, label: &str, shortcut: Shortcut, msg: Message| {
        let s = *sender;
        menu.add(label, shortcut, MenuFlag::Normal, move |_| s.send(msg.clone()));
    };

    add(menu, "File/New", Shortcut::Ctrl | 'n', Message::FileNew);
    add(menu, "File/Open...", Shortcut::Ctrl | 'o', Message::FileOpen);
    add(menu, "File/Save", Shortcut::Ctrl | 's', Message::FileSave);
    add(
        menu,
        "File/Save As...",
        Shortcut::Ctrl | Shortcut::Shift | 's',
        Message::FileSaveAs,
    );
    add(menu, "File/Quit", Shortcut::Ctrl | 'q', Message::Quit);

    add(
        menu,
        "Edit/Start Sequence Paste",
        Shortcut::Ctrl | Shortcut::Shift | 'v',
        Message::StartSequencePaste,
    );
    add(
        menu,
        "Edit/Start List Paste",
        Shortcut::Ctrl | Shortcut::Shift | 'l',
        Message::StartListPaste,
    );
    add(
        menu,
        "Edit/Stop Clipboard Flows",
        Shortcut::None,
        Message::StopClipboardFlows,
    );

    add(
        menu,
        "View/Toggle Dark Mode",
        Shortcut::Ctrl | 'd',
        Message::ToggleDarkMode,
    );
}
