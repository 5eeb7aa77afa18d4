//! Grid games, drawn as fixed-size boards centred in the play area.

use super::canvas::Canvas;
use super::{selection_cells, Area};
use crate::session::MEMORY_COLUMNS;
use crate::theme::Theme;
use arcade_core::games::jigsaw::{Jigsaw, Picture};
use arcade_core::games::maze::{Grid, Maze};
use arcade_core::games::memory::{self, CardState, Memory};
use arcade_core::games::snake::{self, Snake};
use arcade_core::games::sudoku::{self, Sudoku};
use arcade_core::games::tetris::{self, Kind, Tetris};
use arcade_core::games::wordsearch::{self, WordSearch};
use arcade_core::{Direction, GridPos, Playable, Status};
use crossterm::style::Color;

/// Terminal colour for a tetromino
fn kind_color(kind: Kind) -> Color {
    let (r, g, b) = kind.rgb();
    Color::Rgb { r, g, b }
}

/// One cell showing two stacked "pixels" with half blocks
fn half_block(canvas: &mut Canvas, x: i32, y: i32, top: Option<Color>, bottom: Option<Color>) {
    match (top, bottom) {
        (None, None) => {}
        (Some(t), None) => canvas.put(x, y, '▀', t),
        (None, Some(b)) => canvas.put(x, y, '▄', b),
        (Some(t), Some(b)) if t == b => canvas.put(x, y, '█', t),
        (Some(t), Some(b)) => canvas.put_bg(x, y, '▀', t, b),
    }
}

pub fn snake(canvas: &mut Canvas, area: Area, game: &Snake, theme: &Theme) {
    let size = snake::GRID_SIZE as i32;
    let board = area.centered(size * 2, size);
    canvas.frame(board.x, board.y, board.w, board.h, theme.border);

    let cell = |pos: GridPos| (board.x + pos.col as i32 * 2, board.y + pos.row as i32);
    if let Some(food) = game.food() {
        let (x, y) = cell(food);
        canvas.text(x, y, "◆ ", theme.pickup);
    }
    for part in game.body().skip(1) {
        let (x, y) = cell(part);
        canvas.text(x, y, "██", theme.player);
    }
    let (x, y) = cell(game.head());
    let head = if game.status() == Status::Lost { theme.error } else { theme.title };
    canvas.text(x, y, "▓▓", head);
}

/// Whether a slot of the doubled wall grid is solid.
/// Cell (r, c) sits at (2r + 1, 2c + 1); the slots between cells are walls or passages.
fn wall_at(grid: &Grid, gr: usize, gc: usize) -> bool {
    match (gr % 2, gc % 2) {
        (0, 0) => true,
        (1, 1) => false,
        (1, _) => {
            let row = (gr - 1) / 2;
            if gc == 0 {
                grid.cell(GridPos::new(row, 0)).has_wall(Direction::Left)
            } else {
                grid.cell(GridPos::new(row, gc / 2 - 1)).has_wall(Direction::Right)
            }
        }
        _ => {
            let col = (gc - 1) / 2;
            if gr == 0 {
                grid.cell(GridPos::new(0, col)).has_wall(Direction::Up)
            } else {
                grid.cell(GridPos::new(gr / 2 - 1, col)).has_wall(Direction::Down)
            }
        }
    }
}

pub fn maze(canvas: &mut Canvas, area: Area, game: &Maze, theme: &Theme) {
    let grid = game.grid();
    let slots_h = grid.rows() * 2 + 1;
    let slots_w = grid.cols() * 2 + 1;
    let board = area.centered(slots_w as i32, slots_h.div_ceil(2) as i32);

    let slot_color = |gr: usize, gc: usize| -> Option<Color> {
        if gr >= slots_h {
            return None;
        }
        if gr % 2 == 1 && gc % 2 == 1 {
            let pos = GridPos::new(gr / 2, gc / 2);
            if pos == game.player() {
                return Some(theme.player);
            }
            if pos == game.goal() {
                return Some(theme.success);
            }
            return None;
        }
        wall_at(grid, gr, gc).then_some(theme.border)
    };

    for ty in 0..board.h as usize {
        for gc in 0..slots_w {
            let top = slot_color(ty * 2, gc);
            let bottom = slot_color(ty * 2 + 1, gc);
            half_block(canvas, board.x + gc as i32, board.y + ty as i32, top, bottom);
        }
    }
}

const CARD_W: i32 = 9;
const CARD_H: i32 = 3;

pub fn memory(canvas: &mut Canvas, area: Area, game: &Memory, cursor: usize, theme: &Theme) {
    let columns = MEMORY_COLUMNS as i32;
    let rows = (memory::CARD_COUNT / MEMORY_COLUMNS) as i32;
    let board = area.centered(columns * (CARD_W + 1) - 1, rows * (CARD_H + 1) - 1);

    for (i, card) in game.cards().iter().enumerate() {
        let col = i as i32 % columns;
        let row = i as i32 / columns;
        let x = board.x + col * (CARD_W + 1);
        let y = board.y + row * (CARD_H + 1);

        let (label, fg) = match card.state {
            CardState::Hidden => ("?", theme.dim),
            CardState::Revealed => (game.face_label(card), theme.title),
            CardState::Matched => (game.face_label(card), theme.success),
        };
        let border = if i == cursor { theme.key } else { theme.border };
        let bg = if i == cursor { theme.selected_bg } else { theme.bg };

        for dy in 0..CARD_H {
            for dx in 0..CARD_W {
                canvas.put_bg(x + dx, y + dy, ' ', fg, bg);
            }
        }
        canvas.put(x, y, '╭', border);
        canvas.put(x + CARD_W - 1, y, '╮', border);
        canvas.put(x, y + CARD_H - 1, '╰', border);
        canvas.put(x + CARD_W - 1, y + CARD_H - 1, '╯', border);

        let label: String = label.chars().take(CARD_W as usize - 2).collect();
        let lx = x + (CARD_W - label.chars().count() as i32) / 2;
        canvas.text(lx, y + 1, &label, fg);
    }

    if game.is_locked() {
        let y = board.y + board.h + 1;
        canvas.text(board.x, y, "No match...", theme.error);
    }
}

pub fn jigsaw(canvas: &mut Canvas, area: Area, game: &Jigsaw, picture: &Picture, cursor: usize, theme: &Theme) {
    let size = game.size();
    let tile_w = (picture.width() / size).max(1) as i32;
    let tile_h = (picture.height() / size).max(1) as i32;
    let n = size as i32;
    // One column of space between tiles, rows touch
    let board = area.centered(n * (tile_w + 1) - 1, n * tile_h);
    let solved = game.status() == Status::Won;

    for pos in 0..size * size {
        let col = (pos % size) as i32;
        let row = (pos / size) as i32;
        let x = board.x + col * (tile_w + 1);
        let y = board.y + row * tile_h;

        let bg = if pos == cursor {
            theme.selected_bg
        } else if (row + col) % 2 == 0 {
            theme.bg
        } else {
            theme.highlight_bg
        };
        let fg = if game.held() == Some(pos) {
            theme.pickup
        } else if solved {
            theme.success
        } else {
            theme.fg
        };

        let tile = game.order()[pos];
        for (dy, line) in picture.tile(size, tile).iter().enumerate() {
            canvas.text_bg(x, y + dy as i32, line, fg, bg);
        }
        if !solved {
            canvas.text(x, y, &(tile + 1).to_string(), theme.dim);
        }
    }
}

pub fn word_search(
    canvas: &mut Canvas,
    area: Area,
    game: &WordSearch,
    cursor: GridPos,
    anchor: Option<GridPos>,
    theme: &Theme,
) {
    let size = wordsearch::GRID_SIZE as i32;
    let list_w = 16;
    let board = area.centered(size * 2 + 3 + list_w, size);
    canvas.frame(board.x, board.y, size * 2, size, theme.border);

    let preview = selection_cells(anchor, cursor);
    for row in 0..wordsearch::GRID_SIZE {
        for col in 0..wordsearch::GRID_SIZE {
            let pos = GridPos::new(row, col);
            let bg = if pos == cursor {
                theme.selected_bg
            } else if game.flash_cells().contains(&pos) {
                theme.error
            } else if Some(pos) == anchor || preview.contains(&pos) {
                theme.highlight_bg
            } else {
                theme.bg
            };
            let fg = if game.is_found_cell(pos) { theme.success } else { theme.fg };
            let letter = game.letter(pos).to_uppercase().next().unwrap_or(' ');
            let x = board.x + col as i32 * 2;
            let y = board.y + row as i32;
            canvas.put_bg(x, y, letter, fg, bg);
            canvas.put_bg(x + 1, y, ' ', fg, bg);
        }
    }

    let list_x = board.x + size * 2 + 3;
    for (i, word) in game.words().enumerate() {
        let (mark, fg) = if game.is_found(word) {
            ("✓", theme.success)
        } else {
            (" ", theme.fg)
        };
        canvas.text(list_x, board.y + i as i32, mark, fg);
        canvas.text(list_x + 2, board.y + i as i32, &word.to_uppercase(), fg);
    }
}

/// 9x9 grid with heavy lines on box edges: 4 columns and 2 rows per cell
pub fn sudoku(canvas: &mut Canvas, area: Area, game: &Sudoku, cursor: GridPos, errors: &[GridPos], theme: &Theme) {
    let grid_w = 37;
    let grid_h = 19;
    let board = area.centered(grid_w + 14, grid_h);
    let (x0, y0) = (board.x, board.y);

    for line in 0..=sudoku::SIZE as i32 {
        let heavy = line % sudoku::BOX as i32 == 0;
        let (ch, color) = if heavy { ('=', theme.title) } else { ('-', theme.border) };
        let y = y0 + line * 2;
        for x in 0..grid_w {
            let c = if x % 4 == 0 { '+' } else { ch };
            canvas.put(x0 + x, y, c, color);
        }
    }

    let selected_value = game.value(cursor);
    for row in 0..sudoku::SIZE {
        let y = y0 + row as i32 * 2 + 1;
        for col in 0..=sudoku::SIZE {
            let heavy = col % sudoku::BOX == 0;
            let (ch, color) = if heavy { ('‖', theme.title) } else { ('│', theme.border) };
            canvas.put(x0 + col as i32 * 4, y, ch, color);
        }
        for col in 0..sudoku::SIZE {
            let pos = GridPos::new(row, col);
            let value = game.value(pos);
            let bg = if pos == cursor {
                theme.selected_bg
            } else if errors.contains(&pos) {
                theme.error
            } else if value.is_some() && value == selected_value {
                theme.highlight_bg
            } else if Sudoku::is_related(pos, cursor) {
                theme.highlight_bg
            } else {
                theme.bg
            };
            let fg = if game.has_conflict(pos) {
                theme.error
            } else if game.is_given(pos) {
                theme.fg
            } else {
                theme.info
            };
            let ch = value.map_or('·', |v| char::from(b'0' + v));
            let x = x0 + col as i32 * 4 + 1;
            canvas.text_bg(x, y, &format!(" {} ", ch), fg, bg);
        }
    }

    // Digits still to place
    let panel_x = x0 + grid_w + 3;
    canvas.text(panel_x, y0 + 1, "Digits", theme.title);
    for (i, done) in game.completed_digits().iter().enumerate() {
        let color = if *done { theme.dim } else { theme.fg };
        let label = if *done { format!("{} ✓", i + 1) } else { format!("{}", i + 1) };
        canvas.text(panel_x, y0 + 3 + i as i32, &label, color);
    }
}

pub fn tetris(canvas: &mut Canvas, area: Area, game: &Tetris, theme: &Theme) {
    let cols = tetris::COLS as i32;
    let rows = tetris::ROWS as i32;
    let board = area.centered(cols * 2 + 14, rows);
    canvas.frame(board.x, board.y, cols * 2, rows, theme.border);

    for (y, line) in game.well().iter().enumerate() {
        for (x, slot) in line.iter().enumerate() {
            let sx = board.x + x as i32 * 2;
            let sy = board.y + y as i32;
            match slot {
                Some(kind) => canvas.text(sx, sy, "██", kind_color(*kind)),
                None => canvas.text(sx, sy, " .", theme.dim),
            }
        }
    }

    let piece = game.piece();
    let drop = game.ghost_y() - piece.y;
    let color = kind_color(piece.kind);
    for (x, y) in piece.cells() {
        canvas.text(board.x + x * 2, board.y + y + drop, "░░", color);
    }
    for (x, y) in piece.cells() {
        canvas.text(board.x + x * 2, board.y + y, "██", color);
    }

    let panel_x = board.x + cols * 2 + 3;
    canvas.text(panel_x, board.y, "Next", theme.title);
    let next = game.next_piece();
    for (r, line) in next.shape().iter().enumerate() {
        for (c, filled) in line.iter().enumerate() {
            if *filled {
                canvas.text(panel_x + c as i32 * 2, board.y + 2 + r as i32, "██", kind_color(next));
            }
        }
    }

    if game.is_paused() {
        let text = "PAUSED (p)";
        let x = board.x + (cols * 2 - text.len() as i32) / 2;
        canvas.text_bg(x, board.y + rows / 2, text, theme.title, theme.selected_bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::games::memory::Deck;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(100, 40);
        canvas.clear(Color::White, Color::Black);
        canvas
    }

    fn text_at(canvas: &Canvas, x: i32, y: i32, len: i32) -> String {
        (x..x + len).filter_map(|cx| canvas.get(cx, y).map(|c| c.ch)).collect()
    }

    #[test]
    fn test_maze_outer_walls_closed() {
        let game = Maze::with_seed(3);
        let grid = game.grid();
        for gc in 0..grid.cols() * 2 + 1 {
            assert!(wall_at(grid, 0, gc));
            assert!(wall_at(grid, grid.rows() * 2, gc));
        }
        for gr in 0..grid.rows() * 2 + 1 {
            assert!(wall_at(grid, gr, 0));
        }
        assert!(!wall_at(grid, 1, 1));
    }

    #[test]
    fn test_maze_walls_match_passages() {
        let game = Maze::with_seed(8);
        let grid = game.grid();
        let pos = GridPos::new(0, 0);
        let open_right = grid.passage(pos, Direction::Right).is_some();
        assert_eq!(wall_at(grid, 1, 2), !open_right);
    }

    #[test]
    fn test_half_blocks() {
        let mut c = canvas();
        half_block(&mut c, 0, 0, Some(Color::Red), None);
        half_block(&mut c, 1, 0, None, Some(Color::Red));
        half_block(&mut c, 2, 0, Some(Color::Red), Some(Color::Red));
        half_block(&mut c, 3, 0, Some(Color::Red), Some(Color::Blue));
        assert_eq!(text_at(&c, 0, 0, 4), "▀▄█▀");
        assert_eq!(c.get(3, 0).map(|cell| cell.bg), Some(Color::Blue));
    }

    #[test]
    fn test_memory_hides_faces() {
        let mut c = canvas();
        let game = Memory::with_seed(Deck::Letters, 1);
        memory(&mut c, Area::new(0, 0, 100, 40), &game, 0, &Theme::dark());
        let text: String = (0..40).map(|y| text_at(&c, 0, y, 100)).collect();
        assert_eq!(text.matches('?').count(), memory::CARD_COUNT);
    }

    #[test]
    fn test_sudoku_draws_givens() {
        let mut c = canvas();
        let game = Sudoku::with_seed(sudoku::Difficulty::Easy, 2);
        let area = Area::new(0, 0, 100, 40);
        sudoku(&mut c, area, &game, GridPos::new(0, 0), &[], &Theme::dark());
        let board = area.centered(37 + 14, 19);
        let row: String = text_at(&c, board.x, board.y, 37);
        assert_eq!(row, "+===+===+===+===+===+===+===+===+===+");
        let given = sudoku::Board::positions().find(|&p| game.is_given(p)).unwrap();
        let x = board.x + given.col as i32 * 4 + 2;
        let y = board.y + given.row as i32 * 2 + 1;
        let digit = game.value(given).map(|v| char::from(b'0' + v));
        assert_eq!(c.get(x, y).map(|cell| cell.ch), digit);
    }

    #[test]
    fn test_tetris_piece_drawn_above_ghost() {
        let mut c = canvas();
        let game = Tetris::with_seed(5);
        let area = Area::new(0, 0, 100, 40);
        tetris(&mut c, area, &game, &Theme::dark());
        let board = area.centered(20 + 14, 20);
        let (x, y) = game.piece().cells().next().unwrap();
        assert_eq!(c.get(board.x + x * 2, board.y + y).map(|cell| cell.ch), Some('█'));
    }

    #[test]
    fn test_snake_head_and_food() {
        let mut c = canvas();
        let game = Snake::with_seed(4);
        let area = Area::new(0, 0, 100, 40);
        snake(&mut c, area, &game, &Theme::dark());
        let board = area.centered(40, 20);
        let head = game.head();
        let cell = c.get(board.x + head.col as i32 * 2, board.y + head.row as i32);
        assert_eq!(cell.map(|c| c.ch), Some('▓'));
        let food = game.food().unwrap();
        let cell = c.get(board.x + food.col as i32 * 2, board.y + food.row as i32);
        assert_eq!(cell.map(|c| c.ch), Some('◆'));
    }
}
