use std::fs;

use fltk::{
    app::Sender,
    dialog,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use super::controllers::highlight::{style_table, HighlightController};
use super::controllers::paste::PasteController;
use super::domain::messages::Message;
use super::domain::settings::{AppSettings, ThemeMode};
use super::infrastructure::buffer::buffer_text_no_leak;
use super::infrastructure::clipboard::SystemClipboard;
use super::services::equation::autocomplete_equals;
use super::services::list_edit::ListEdit;
use super::services::markdown::SyntectTokenLexer;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::ui::main_window::MainWidgets;
use crate::ui::theme::apply_theme;

const FILE_FILTER: &str = "*.{md,markdown,txt}";

/// Receives code-run requests from clicks on runnable fenced blocks.
/// Process launching stays outside the editor core.
pub type CodeRunHandler = Box<dyn FnMut(&str, &str)>;

/// Main application coordinator. Owns the widgets, the single
/// document buffer, and the controllers; the dispatch loop in main
/// calls into here for every message.
pub struct AppState {
    pub editor: TextEditor,
    pub window: Window,
    pub menu: MenuBar,
    pub buffer: TextBuffer,
    pub style_buffer: TextBuffer,
    pub sender: Sender<Message>,
    pub settings: AppSettings,
    pub highlight: HighlightController,
    pub paste: PasteController,
    list_edit: ListEdit,
    pub current_path: Option<String>,
    pub modified: bool,
    pub code_run_handler: Option<CodeRunHandler>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, sender: Sender<Message>, settings: AppSettings) -> Self {
        let highlight = HighlightController::new(
            Some(Box::new(SyntectTokenLexer::new())),
            settings.highlight_debounce_ms as u64,
            settings.highlighting_enabled,
        );
        let paste = PasteController::new(Box::new(SystemClipboard));

        let mut state = Self {
            editor: widgets.editor,
            window: widgets.wind,
            menu: widgets.menu,
            buffer: widgets.buffer,
            style_buffer: widgets.style_buffer,
            sender,
            settings,
            highlight,
            paste,
            list_edit: ListEdit::new(),
            current_path: None,
            modified: false,
            code_run_handler: None,
        };
        state.refresh_highlight_data();
        state.apply_current_theme();
        state.update_window_title();
        state
    }

    fn is_dark(&self) -> bool {
        self.settings.theme_mode == ThemeMode::Dark
    }

    pub fn update_window_title(&mut self) {
        let name = self
            .current_path
            .as_deref()
            .unwrap_or("Untitled");
        let prefix = if self.modified { "*" } else { "" };
        self.window.set_label(&format!("{}{} - MarkPad", prefix, name));
    }

    fn refresh_highlight_data(&mut self) {
        let table = style_table(self.settings.theme_mode, self.settings.font_size as i32);
        self.editor
            .set_highlight_data(self.style_buffer.clone(), table);
    }

    pub fn apply_current_theme(&mut self) {
        let is_dark = self.is_dark();
        apply_theme(&mut self.editor, &mut self.window, &mut self.menu, is_dark);
        self.refresh_highlight_data();
    }

    // ---------- File operations ----------

    pub fn file_new(&mut self) {
        if !self.confirm_discard() {
            return;
        }
        self.buffer.set_text("");
        self.current_path = None;
        self.modified = false;
        self.update_window_title();
        self.reclassify_now();
    }

    pub fn file_open(&mut self) {
        if !self.confirm_discard() {
            return;
        }
        if let Some(path) = native_open_dialog(FILE_FILTER) {
            match fs::read_to_string(&path) {
                Ok(content) => {
                    self.buffer.set_text(&content);
                    self.current_path = Some(path);
                    self.modified = false;
                    self.update_window_title();
                    self.reclassify_now();
                }
                Err(e) => dialog::alert_default(&format!("Error opening file: {}", e)),
            }
        }
    }

    pub fn file_save(&mut self) {
        match self.current_path.clone() {
            Some(path) => self.save_to(&path),
            None => self.file_save_as(),
        }
    }

    pub fn file_save_as(&mut self) {
        if let Some(path) = native_save_dialog(FILE_FILTER) {
            self.save_to(&path);
        }
    }

    fn save_to(&mut self, path: &str) {
        let text = buffer_text_no_leak(&self.buffer);
        match fs::write(path, text) {
            Ok(()) => {
                self.current_path = Some(path.to_string());
                self.modified = false;
                self.update_window_title();
            }
            Err(e) => dialog::alert_default(&format!("Error saving file: {}", e)),
        }
    }

    /// True when it is safe to drop the current buffer contents.
    fn confirm_discard(&mut self) -> bool {
        if !self.modified {
            return true;
        }
        match dialog::choice2_default(
            "The document has unsaved changes.",
            "Save",
            "Discard",
            "Cancel",
        ) {
            Some(0) => {
                self.file_save();
                !self.modified
            }
            Some(1) => true,
            _ => false,
        }
    }

    /// Quit, prompting for unsaved changes first.
    pub fn request_quit(&mut self) {
        if self.confirm_discard() {
            self.paste.stop();
            fltk::app::quit();
        }
    }

    // ---------- Highlighting ----------

    pub fn text_changed(&mut self) {
        if !self.modified {
            self.modified = true;
            self.update_window_title();
        }
        self.highlight.schedule_reclassify(&self.sender);
    }

    pub fn reclassify_now(&mut self) {
        let text = buffer_text_no_leak(&self.buffer);
        let style = self.highlight.reclassify(&text);
        self.style_buffer.set_text(&style);
        self.editor.redraw();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.settings.theme_mode = if self.is_dark() {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        self.apply_current_theme();
        if let Err(e) = self.settings.save() {
            eprintln!("Failed to save settings: {}", e);
        }
    }

    // ---------- Editor events ----------

    pub fn editor_clicked(&mut self, pos: i32) {
        let pos = pos.max(0) as usize;
        if let Some(link) = self.highlight.link_at(pos) {
            self.sender.send(Message::OpenLink(link.url.clone()));
        } else if let Some(run) = self.highlight.code_run_at(pos) {
            self.sender.send(Message::RunCodeBlock(run.index));
        }
    }

    pub fn open_link(&self, url: &str) {
        if let Err(e) = open::that(url) {
            eprintln!("Failed to open link {}: {}", url, e);
        }
    }

    pub fn run_code_block(&mut self, index: usize) {
        let Some(run) = self
            .highlight
            .result()
            .code_runs
            .iter()
            .find(|r| r.index == index)
        else {
            return;
        };
        let (start, end) = run.body_span;
        let language = run.language.clone();
        let body = self
            .buffer
            .text_range(start as i32, end as i32)
            .unwrap_or_default();
        match self.code_run_handler.as_mut() {
            Some(handler) => handler(&language, &body),
            None => eprintln!("Code run requested for {} block {}", language, index),
        }
    }

    /// A `=` was typed: evaluate the expression before it on the
    /// current line and insert the result after the caret.
    pub fn equals_typed(&mut self) {
        let pos = self.editor.insert_position();
        let line_start = self.buffer.line_start(pos);
        let Some(prefix) = self.buffer.text_range(line_start, pos) else {
            return;
        };
        if let Some(result) = autocomplete_equals(&prefix) {
            self.buffer.insert(pos, &result);
            self.editor.set_insert_position(pos + result.len() as i32);
        }
    }

    /// Renumber the ordered-list block around a zero-based line index.
    pub fn renumber_list(&mut self, line_index: usize) {
        let text = buffer_text_no_leak(&self.buffer);
        let replacements = self.list_edit.renumber_ordered_block(&text, line_index);
        if replacements.is_empty() {
            return;
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let mut offsets = Vec::with_capacity(lines.len());
        let mut acc = 0usize;
        for line in &lines {
            offsets.push(acc);
            acc += line.len() + 1;
        }

        // Patch from the bottom up so earlier offsets stay valid
        for (idx, new_line) in replacements.iter().rev() {
            let Some(&start) = offsets.get(*idx) else {
                continue;
            };
            let end = start + lines[*idx].len();
            self.buffer.replace(start as i32, end as i32, new_line);
        }
    }

    // ---------- Clipboard flows ----------

    pub fn start_sequence_paste(&mut self) {
        if let Err(e) = self.paste.start_sequence(self.settings.sequence_options) {
            eprintln!("Failed to start sequence paste: {}", e);
        }
    }

    pub fn start_list_paste(&mut self) {
        let selection = self.buffer.selection_text();
        if selection.is_empty() {
            dialog::message_default("Select a list to paste from first.");
            return;
        }
        match self.paste.start_list_paste(&selection) {
            Ok(true) => {}
            Ok(false) => dialog::message_default("The selection holds no list items."),
            Err(e) => eprintln!("Failed to start list paste: {}", e),
        }
    }

    pub fn stop_clipboard_flows(&mut self) {
        self.paste.stop();
    }

    pub fn global_paste(&mut self) {
        if let Err(e) = self.paste.handle_paste_event() {
            eprintln!("Clipboard error during paste: {}", e);
        }
    }
}
