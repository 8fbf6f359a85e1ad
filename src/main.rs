use fltk::{
    app::{self, Sender},
    enums::{Event, EventState, Key},
    prelude::*,
};

use mark_pad::app::domain::messages::Message;
use mark_pad::app::domain::settings::AppSettings;
use mark_pad::app::services::list_edit::{ListContinuation, ListEdit};
use mark_pad::app::state::AppState;
use mark_pad::ui::main_window::{build_main_window, MainWidgets};
use mark_pad::ui::menu::build_menu;

#[cfg(not(target_os = "windows"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() {
    let fltk_app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let settings = AppSettings::load();
    let mut widgets = build_main_window();
    build_menu(&mut widgets.menu, &sender);
    wire_editor_events(&mut widgets, &sender);

    let mut state = AppState::new(widgets, sender, settings);
    state.window.show();
    state.reclassify_now();

    while fltk_app.wait() {
        if let Some(msg) = receiver.recv() {
            match msg {
                Message::FileNew => state.file_new(),
                Message::FileOpen => state.file_open(),
                Message::FileSave => state.file_save(),
                Message::FileSaveAs => state.file_save_as(),
                Message::Quit => state.request_quit(),

                Message::ToggleDarkMode => state.toggle_dark_mode(),

                Message::TextChanged => state.text_changed(),
                Message::Reclassify => state.reclassify_now(),

                Message::EditorClicked(pos) => state.editor_clicked(pos),
                Message::EqualsTyped => state.equals_typed(),
                Message::RenumberList(line) => state.renumber_list(line),

                Message::StartSequencePaste => state.start_sequence_paste(),
                Message::StartListPaste => state.start_list_paste(),
                Message::StopClipboardFlows => state.stop_clipboard_flows(),
                Message::GlobalPaste => state.global_paste(),

                Message::OpenLink(url) => state.open_link(&url),
                Message::RunCodeBlock(index) => state.run_code_block(index),
            }
        }
    }
}

/// Hook buffer edits and the editor key/mouse events into the message
/// channel. List continuation runs synchronously here because it has to
/// decide whether the Enter key is consumed before FLTK handles it.
fn wire_editor_events(widgets: &mut MainWidgets, sender: &Sender<Message>) {
    let s = *sender;
    widgets
        .buffer
        .add_modify_callback(move |_, inserted, deleted, _, _| {
            if inserted > 0 || deleted > 0 {
                s.send(Message::TextChanged);
            }
        });

    let mut buf = widgets.buffer.clone();
    let list_edit = ListEdit::new();
    let s = *sender;
    widgets.editor.handle(move |ed, ev| match ev {
        Event::KeyDown => {
            let key = app::event_key();
            if key == Key::Enter || key == Key::KPEnter {
                return handle_enter(ed, &mut buf, &list_edit, &s);
            }
            if key == Key::from_char('v') && app::event_state().contains(EventState::Ctrl) {
                // Let the paste happen, then advance any clipboard flow
                s.send(Message::GlobalPaste);
            }
            false
        }
        Event::KeyUp => {
            if app::event_text() == "=" {
                s.send(Message::EqualsTyped);
            }
            false
        }
        Event::Released => {
            if app::event_is_click() {
                s.send(Message::EditorClicked(ed.insert_position()));
            }
            false
        }
        _ => false,
    });
}

/// Returns true when the Enter key was fully handled here.
fn handle_enter(
    ed: &mut fltk::text::TextEditor,
    buf: &mut fltk::text::TextBuffer,
    list_edit: &ListEdit,
    sender: &Sender<Message>,
) -> bool {
    let pos = ed.insert_position();
    let line_start = buf.line_start(pos);
    let line_end = buf.line_end(pos);
    let line = buf.text_range(line_start, line_end).unwrap_or_default();

    match list_edit.continuation(&line) {
        ListContinuation::NotAList => false,
        ListContinuation::Continue { insert } => {
            let ordered = insert
                .trim_start_matches(['\n', '\t', ' '])
                .starts_with(|c: char| c.is_ascii_digit());
            buf.insert(pos, &insert);
            ed.set_insert_position(pos + insert.len() as i32);
            if ordered {
                let before = buf.text_range(0, pos).unwrap_or_default();
                let new_line_index = before.matches('\n').count() + 1;
                sender.send(Message::RenumberList(new_line_index));
            }
            true
        }
        ListContinuation::BreakList { indent } => {
            buf.replace(line_start, line_end, &indent);
            ed.set_insert_position(line_start + indent.len() as i32);
            true
        }
    }
}
