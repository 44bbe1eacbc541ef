use blockdrop_engine::{Board, CellColor, SQUARES_PER_PIECE, Square};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::widgets::CellDisplay;

/// The play field: placed squares plus the falling piece, rendered as a
/// grid of [`CellDisplay`] cells.
///
/// The grid dimensions come from the board limits, so non-default board
/// sizes render without any widget changes.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling: Option<[Square; SQUARES_PER_PIECE]>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling: None,
            block: None,
        }
    }

    pub fn falling_squares(self, squares: [Square; SQUARES_PER_PIECE]) -> Self {
        Self {
            falling: Some(squares),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        self.board.limits().x as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        self.board.limits().y as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    #[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let limits = self.board.limits();
        let mut grid: Vec<Vec<Option<CellColor>>> =
            vec![vec![None; limits.x as usize]; limits.y as usize];
        let falling = self.falling.as_ref().map_or(&[][..], |squares| squares);
        for square in self.board.squares().iter().chain(falling) {
            if self.board.in_bounds(square.coord) {
                grid[square.coord.y as usize][square.coord.x as usize] = Some(square.color);
            }
        }

        for (y, row) in grid.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let cell_area = Rect::new(
                    area.x + x as u16 * CellDisplay::width(),
                    area.y + y as u16 * CellDisplay::height(),
                    CellDisplay::width(),
                    CellDisplay::height(),
                )
                .intersection(area);
                if !cell_area.is_empty() {
                    CellDisplay::from_cell(*cell).render(cell_area, buf);
                }
            }
        }
    }
}
