use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::constants::DEFAULT_TITLE_BAR_HEIGHT;

/// Draws the chrome around a container and reports how many rows it takes
/// from the top, which feeds the container's `OffsetInfo`.
pub trait WindowDecorator: std::fmt::Debug {
    fn title_bar_height(&self) -> u16;

    fn render_chrome(&self, buffer: &mut Buffer, rect: Rect, title: &str, focused: bool);
}

#[derive(Debug)]
pub struct DefaultDecorator;

impl WindowDecorator for DefaultDecorator {
    fn title_bar_height(&self) -> u16 {
        DEFAULT_TITLE_BAR_HEIGHT
    }

    fn render_chrome(&self, buffer: &mut Buffer, rect: Rect, title: &str, focused: bool) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let focused_header_style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let normal_header_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let border_style = Style::default().fg(Color::DarkGray).bg(Color::Reset);

        let header_style = if focused {
            focused_header_style
        } else {
            normal_header_style
        };

        let outer_left = rect.x;
        let outer_top = rect.y;
        let outer_right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let outer_bottom = rect.y.saturating_add(rect.height).saturating_sub(1);
        let header_y = rect.y.saturating_add(1);

        // Top border
        for x in outer_left..=outer_right {
            if let Some(cell) = buffer.cell_mut((x, outer_top)) {
                let symbol = if x == outer_left {
                    "┌"
                } else if x == outer_right {
                    "┐"
                } else {
                    "─"
                };
                cell.set_symbol(symbol);
                cell.set_style(border_style);
            }
        }

        // Header
        if header_y < outer_bottom {
            for x in outer_left.saturating_add(1)..outer_right {
                if let Some(cell) = buffer.cell_mut((x, header_y)) {
                    cell.set_symbol(" ");
                    cell.set_style(header_style);
                }
            }
            let header_width = outer_right.saturating_sub(outer_left).saturating_sub(1);
            let title_len = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
            if title_len <= header_width {
                let start_x = outer_left
                    .saturating_add(1)
                    .saturating_add((header_width - title_len) / 2);
                for (x, ch) in (start_x..outer_right).zip(title.chars()) {
                    if let Some(cell) = buffer.cell_mut((x, header_y)) {
                        cell.set_symbol(&ch.to_string());
                        cell.set_style(header_style);
                    }
                }
            }
        }

        // Sides
        for y in outer_top.saturating_add(1)..outer_bottom {
            for x in [outer_left, outer_right] {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol("│");
                    cell.set_style(border_style);
                }
            }
        }

        // Bottom border
        for x in outer_left..=outer_right {
            if let Some(cell) = buffer.cell_mut((x, outer_bottom)) {
                let symbol = if x == outer_left {
                    "└"
                } else if x == outer_right {
                    "┘"
                } else {
                    "─"
                };
                cell.set_symbol(symbol);
                cell.set_style(border_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chrome_draws_title_and_border() {
        let area = Rect::new(0, 0, 12, 5);
        let mut buffer = Buffer::empty(area);
        DefaultDecorator.render_chrome(&mut buffer, area, "main", true);

        assert_eq!(buffer[(0, 0)].symbol(), "┌");
        assert_eq!(buffer[(11, 0)].symbol(), "┐");
        assert_eq!(buffer[(0, 4)].symbol(), "└");
        assert_eq!(buffer[(0, 2)].symbol(), "│");
        let header: String = (1..11).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert_eq!(header.trim(), "main");
        assert_eq!(DefaultDecorator.title_bar_height(), 2);
    }

    #[test]
    fn oversized_title_leaves_header_blank() {
        let area = Rect::new(0, 0, 12, 4);
        let mut buffer = Buffer::empty(area);
        let title = "w".repeat(usize::from(u16::MAX) + 5);
        DefaultDecorator.render_chrome(&mut buffer, area, &title, true);
        let header: String = (1..11).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert_eq!(header.trim(), "");
        assert_eq!(buffer[(0, 0)].symbol(), "┌");
    }

    #[test]
    fn tiny_area_is_left_alone() {
        let area = Rect::new(0, 0, 1, 1);
        let mut buffer = Buffer::empty(area);
        DefaultDecorator.render_chrome(&mut buffer, area, "x", false);
        assert_eq!(buffer[(0, 0)].symbol(), " ");
    }
}
