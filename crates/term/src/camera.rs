//! Camera framing: how much of the screen the board gets.
//!
//! The board is framed like an orthographic camera centred on it: the
//! half-height of the view is large enough to show every row and column plus a
//! border of `border` cells on each side. Terminal cells are about twice as
//! tall as wide, so one board cell is drawn `2 * cell_h` columns wide.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Board-space point at the centre of the view
    pub center: (f32, f32),
    /// Half of the visible height, in board cells
    pub ortho_size: f32,
}

impl CameraFrame {
    /// Frame a `width x height` board with `border` cells of margin for a view
    /// of the given aspect ratio (visible width / visible height).
    pub fn fit(width: u16, height: u16, border: u16, aspect: f32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let b = border as f32;

        let vertical = h / 2.0 + b;
        let horizontal = if aspect > 0.0 {
            (w / 2.0 + b) / aspect
        } else {
            vertical
        };

        Self {
            center: ((w - 1.0) / 2.0, (h - 1.0) / 2.0),
            ortho_size: vertical.max(horizontal),
        }
    }

    /// Frame a board for a terminal viewport of `columns x rows` characters.
    pub fn fit_viewport(width: u16, height: u16, border: u16, columns: u16, rows: u16) -> Self {
        // Aspect in board cells: two terminal columns per row.
        let aspect = if rows == 0 {
            0.0
        } else {
            (columns as f32 / 2.0) / rows as f32
        };
        Self::fit(width, height, border, aspect)
    }

    /// Terminal `(columns, rows)` per board cell for a viewport `rows` tall.
    pub fn cell_size(&self, rows: u16) -> (u16, u16) {
        let cell_h = if self.ortho_size > 0.0 {
            (rows as f32 / (2.0 * self.ortho_size)).floor() as u16
        } else {
            1
        };
        let cell_h = cell_h.max(1);
        (cell_h * 2, cell_h)
    }
}
