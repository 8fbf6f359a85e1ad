use fltk::{
    enums::Color,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub editor: TextEditor,
    pub buffer: TextBuffer,
    pub style_buffer: TextBuffer,
}

pub fn build_main_window() -> MainWidgets {
    let mut wind = Window::new(100, 100, 760, 560, "Untitled - MarkPad");
    wind.set_xclass("MarkPad");

    let mut flex = Flex::new(0, 0, 760, 560, None);
    flex.set_type(fltk::group::FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, 30, "");
    flex.fixed(&menu, 30);

    let buffer = TextBuffer::default();
    let style_buffer = TextBuffer::default();
    let mut editor = TextEditor::new(0, 0, 0, 0, "");
    editor.set_buffer(buffer.clone());
    editor.wrap_mode(WrapMode::AtBounds, 0);

    // Line number styling (set once)
    editor.set_linenumber_bgcolor(Color::from_rgb(240, 240, 240));
    editor.set_linenumber_fgcolor(Color::from_rgb(100, 100, 100));

    flex.end();
    wind.resizable(&flex);

    MainWidgets {
        wind,
        flex,
        menu,
        editor,
        buffer,
        style_buffer,
    }
}
