use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::App;
use crate::components::body::BodyWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tag::TagWidget;
use crate::host::MemoryHost;
use crate::launch::Launcher;
use crate::theme::ThemeColors;
use crate::view::{line_starts, tag_line, BodyView};

/// Render the window: tag row, body, status bar.
///
/// Records the areas in `view` so mouse events can be mapped back.
pub fn render<L: Launcher>(
    app: &App<MemoryHost, L>,
    view: &mut BodyView,
    theme: &ThemeColors,
    frame: &mut Frame,
) {
    let [tag_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    view.tag_area = tag_area;
    view.body_area = body_area;

    let title = app.host.title();
    let tag = tag_line(title, app.host.tag());
    frame.render_widget(TagWidget::new(title, &tag, theme), tag_area);

    let body = app.host.body();
    let starts = line_starts(body);
    view.clamp(starts.len());
    frame.render_widget(
        BodyWidget::new(body, &starts, view.scroll, view.cursor, theme),
        body_area,
    );

    let root = app.session.root.display().to_string();
    let mut info = String::from(if app.session.show_hidden {
        "hidden: shown"
    } else {
        "hidden: off"
    });
    if app.host.is_dirty() {
        info.push_str(" [modified]");
    }
    let mut status = StatusBarWidget::new(&root, &info, theme);
    if let Some(msg) = &app.status_message {
        status = status.status_message(&msg.text, msg.is_error);
    }
    frame.render_widget(status, status_area);
}
