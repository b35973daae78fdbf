//! Draws live scene surfaces as bordered blocks.
//!
//! The most recent dialog surface is drawn centered; private surfaces opened
//! after it are stacked on top, slightly offset. Vertical and scroll layouts
//! stack their children, horizontal layouts and panels put them on one row.

use dialogkit_engine::scene::{SceneSurface, WidgetSnapshot, WidgetView};
use dialogkit_engine::{Alignment, LayoutKind, Surface, SurfaceKind, Tone, WidgetId};
use dialogkit_types::{EditorKind, ValueKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use serde_json::Value as JsonValue;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::ui::edit_buffer::EditBuffer;

pub const HINTS: &str = "Tab/Shift+Tab move  Enter press  Space toggle  Esc close  Ctrl+C quit";

/// Terminal columns per canvas unit.
const COLUMNS_PER_UNIT: f32 = 0.3;
const MIN_WIDTH: u16 = 24;
const EDITOR_VALUE_WIDTH: usize = 32;

pub fn draw(frame: &mut Frame, app: &App) {
    let [body, hints] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
    let surfaces = app.host().surfaces();
    let start = surfaces.iter().rposition(|surface| surface.kind() == SurfaceKind::Dialog).unwrap_or(0);
    let top = surfaces.len().saturating_sub(1);
    for (index, surface) in surfaces.iter().enumerate().skip(start) {
        draw_surface(frame, body, surface, app, index - start, index == top);
    }
    frame.render_widget(Paragraph::new(HINTS).style(Style::default().fg(Color::DarkGray)), hints);
}

fn draw_surface(frame: &mut Frame, body: Rect, surface: &SceneSurface, app: &App, depth: usize, is_top: bool) {
    let width = ((surface.size().width * COLUMNS_PER_UNIT).round() as u16).clamp(MIN_WIDTH.min(body.width), body.width);
    let inner_width = usize::from(width.saturating_sub(2)).max(1);
    let focused = if is_top { app.focused() } else { None };

    let mut lines = Vec::new();
    collect_lines(surface, surface.root(), inner_width, app, focused, &mut lines);
    let rows: usize = lines.iter().map(|line| line.width().div_ceil(inner_width).max(1)).sum();
    let height = u16::try_from(rows + 2).unwrap_or(u16::MAX).min(body.height);

    let offset = u16::try_from(depth * 2).unwrap_or(u16::MAX);
    let x = body.x + (body.width - width) / 2;
    let y = (body.y + body.height.saturating_sub(height) / 2 + offset).min(body.y + body.height.saturating_sub(height));
    let area = Rect::new(x, y, width, height);

    let border = if is_top {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::bordered().title(format!(" {} ", surface.title())).border_style(border);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn tone_style(tone: Tone, enabled: bool) -> Style {
    if !enabled {
        return Style::default().fg(Color::DarkGray);
    }
    match tone {
        Tone::Normal => Style::default(),
        Tone::Label => Style::default().add_modifier(Modifier::BOLD),
        Tone::Error => Style::default().fg(Color::Red),
    }
}

fn aligned(line: Line<'static>, alignment: Alignment) -> Line<'static> {
    match alignment {
        Alignment::Left => line,
        Alignment::Right => line.right_aligned(),
    }
}

fn collect_lines(surface: &SceneSurface, id: WidgetId, width: usize, app: &App, focused: Option<WidgetId>, out: &mut Vec<Line<'static>>) {
    let Some(widget) = surface.widget(id) else {
        return;
    };
    if !widget.active {
        return;
    }
    let enabled = surface.is_enabled(id);
    match &widget.view {
        WidgetView::Layout(layout) if matches!(layout.kind, LayoutKind::Vertical | LayoutKind::Scroll) => {
            for child in &widget.children {
                collect_lines(surface, *child, width, app, focused, out);
            }
        }
        WidgetView::Text(content) => {
            let style = tone_style(widget.style.tone, enabled);
            for paragraph in content.lines() {
                for wrapped in textwrap::wrap(paragraph, width) {
                    out.push(aligned(Line::styled(wrapped.into_owned(), style), widget.style.alignment));
                }
            }
        }
        _ => {
            let spans = inline_spans(surface, &widget, app, focused);
            if !spans.is_empty() {
                out.push(Line::from(spans));
            }
        }
    }
}

/// Spans of a widget rendered on a single row.
fn inline_spans(surface: &SceneSurface, widget: &WidgetSnapshot, app: &App, focused: Option<WidgetId>) -> Vec<Span<'static>> {
    if !widget.active {
        return Vec::new();
    }
    let enabled = surface.is_enabled(widget.id);
    let is_focused = focused == Some(widget.id);
    let highlight = |style: Style| if is_focused { style.add_modifier(Modifier::REVERSED) } else { style };

    match &widget.view {
        WidgetView::Layout(_) => {
            let mut spans = Vec::new();
            for child in widget.children.iter().filter_map(|child| surface.widget(*child)) {
                let child_spans = inline_spans(surface, &child, app, focused);
                if child_spans.is_empty() {
                    continue;
                }
                if !spans.is_empty() {
                    spans.push(Span::raw("  "));
                }
                spans.extend(child_spans);
            }
            spans
        }
        WidgetView::Text(content) if content.is_empty() => Vec::new(),
        WidgetView::Text(content) => vec![Span::styled(content.replace('\n', " "), tone_style(widget.style.tone, enabled))],
        WidgetView::Button(label) => vec![Span::styled(format!("[ {label} ]"), highlight(tone_style(Tone::Normal, enabled)))],
        WidgetView::Editor { label, kind, value, mask } => {
            let buffer = if is_focused { app.buffer_for(widget.id) } else { None };
            let shown = match buffer {
                Some(buffer) => buffer.display(*mask),
                None => editor_text(*kind, value, *mask),
            };
            let shown = if shown.is_empty() { " ".to_string() } else { fit_width(&shown, EDITOR_VALUE_WIDTH) };
            vec![
                Span::styled(format!("{label}: "), tone_style(Tone::Label, enabled)),
                Span::styled(shown, highlight(tone_style(Tone::Normal, enabled).add_modifier(Modifier::UNDERLINED))),
            ]
        }
    }
}

fn editor_text(kind: EditorKind, value: &JsonValue, mask: Option<char>) -> String {
    match (kind, value) {
        (EditorKind::Value(ValueKind::Boolean), value) => {
            if value.as_bool().unwrap_or(false) {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            }
        }
        (EditorKind::Reference, JsonValue::Null) => "<none>".to_string(),
        (_, value) => EditBuffer::from_value(value).display(mask),
    }
}

/// Keeps the tail of `text` within `max` columns, which is where the cursor
/// sits while typing.
fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut kept = Vec::new();
    let mut used = 1;
    for c in text.chars().rev() {
        let width = c.width().unwrap_or(0);
        if used + width > max {
            break;
        }
        used += width;
        kept.push(c);
    }
    kept.push('…');
    kept.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_values_keep_their_tail() {
        assert_eq!(fit_width("short", 10), "short");
        assert_eq!(fit_width("abcdefghij", 5), "…ghij");
    }

    #[test]
    fn right_aligned_text_keeps_its_content() {
        let line = aligned(Line::raw("Missing text"), Alignment::Right);
        assert_eq!(line.alignment, Some(ratatui::layout::Alignment::Right));
        assert_eq!(aligned(Line::raw("ok"), Alignment::Left).alignment, None);
    }

    #[test]
    fn booleans_and_empty_references_have_placeholders() {
        assert_eq!(editor_text(EditorKind::Value(ValueKind::Boolean), &JsonValue::Bool(true), None), "[x]");
        assert_eq!(editor_text(EditorKind::Reference, &JsonValue::Null, None), "<none>");
        assert_eq!(editor_text(EditorKind::Value(ValueKind::Text), &JsonValue::String("abc".into()), Some('*')), "***");
    }
}
