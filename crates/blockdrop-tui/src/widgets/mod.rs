use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{board_display::*, cell_display::*};

mod board_display;
mod cell_display;

pub mod style {
    use blockdrop_engine::CellColor;
    use ratatui::style::{Color, Style};

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(Color::Rgb(255, 255, 255), Color::Rgb(0, 0, 0));
    pub const EMPTY_DOT: Style = fg_bg(Color::Rgb(127, 127, 127), Color::Rgb(0, 0, 0));

    /// Fill style for one cell color tag.
    #[must_use]
    pub const fn cell(color: CellColor) -> Style {
        let rgb = match color {
            CellColor::Yellow => Color::Rgb(255, 255, 0),
            CellColor::Cyan => Color::Rgb(0, 255, 255),
            CellColor::Orange => Color::Rgb(255, 127, 0),
            CellColor::Blue => Color::Rgb(0, 0, 255),
            CellColor::Purple => Color::Rgb(160, 32, 240),
            CellColor::Green => Color::Rgb(0, 255, 0),
            CellColor::Red => Color::Rgb(255, 0, 0),
        };
        bg_only(rgb)
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
