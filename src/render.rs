use crate::ScreenSize;
use crate::coord::ScreenPos;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// How cells are turned into characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One character per cell
    Glyph { live: char, dead: char },

    /// One braille character per 2x4 block of cells
    Braille,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::Glyph {
            live: 'X',
            dead: ' ',
        }
    }
}

impl RenderMode {
    /// Number of cells `(across, down)` covered by a single terminal character.
    pub const fn cells_per_char(&self) -> (ScreenSize, ScreenSize) {
        match self {
            Self::Glyph { .. } => (1, 1),
            Self::Braille => (2, 4),
        }
    }
}

/// Turns the live screen positions of a single frame into text.
pub struct Frame {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    mode: RenderMode,

    /// Width of the cell buffer
    w: usize,

    /// Height of the cell buffer
    h: usize,
}

impl Frame {
    /// A blank frame `w` cells across and `h` cells down.
    pub fn new(w: ScreenSize, h: ScreenSize, mode: RenderMode) -> Self {
        let (w, h) = (w as usize, h as usize);

        Self {
            cb: vec![false; w * h],
            fb: String::new(),
            mode,
            w,
            h,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Resize the cell buffer, clearing it.
    pub fn resize(&mut self, w: ScreenSize, h: ScreenSize) {
        let (w, h) = (w as usize, h as usize);
        if (w, h) == (self.w, self.h) {
            return;
        }

        self.w = w;
        self.h = h;
        self.cb = vec![false; w * h];
    }

    /// Reset the cell buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Turns on a single cell. Positions outside the frame are ignored.
    pub fn draw_cell(&mut self, s: ScreenPos) {
        let (x, y) = (s.col as usize, s.row as usize);
        if x >= self.w || y >= self.h {
            return;
        }

        let i = self.xy_from(x, y);
        self.cb[i] = true;
    }

    pub fn draw(&mut self, cells: &[ScreenPos]) {
        for &s in cells {
            self.draw_cell(s);
        }
    }

    /// Render the cell buffer, one line of text per terminal row, each terminated by `\n`.
    pub fn render(&mut self) -> &str {
        self.fb.clear();

        let mode = self.mode;
        match mode {
            RenderMode::Glyph { live, dead } => self.render_glyphs(live, dead),
            RenderMode::Braille => self.render_braille(),
        }

        &self.fb
    }

    fn render_glyphs(&mut self, live: char, dead: char) {
        self.fb.reserve((self.w * live.len_utf8().max(dead.len_utf8()) + 1) * self.h);

        for row in self.cb.chunks(self.w.max(1)).take(self.h) {
            self.fb.extend(row.iter().map(|&px| if px { live } else { dead }));
            self.fb.push('\n');
        }
    }

    fn render_braille(&mut self) {
        // Let `w` and `h` refer to width and height of the cell buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our
        // framebuffer. Each braille character is 3 bytes in UTF-8, each newline one byte.
        let (bw, bh) = (self.w.div_ceil(2), self.h.div_ceil(4));
        let mut cp = vec![BRAILLE_EMPTY; bw * bh];

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = self.xy_to(n);
                cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        self.fb.reserve(3 * (bw * bh) + bh);

        for line in cp.chunks(bw.max(1)).take(bh) {
            // every sum of dots stays within U+2800..=U+28FF
            self.fb
                .extend(line.iter().filter_map(|&c| char::from_u32(c)));
            self.fb.push('\n');
        }
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use super::RenderMode;
    use crate::coord::ScreenPos;

    const DOTS: RenderMode = RenderMode::Glyph {
        live: '#',
        dead: '.',
    };

    fn positions(cells: &[(u16, u16)]) -> Vec<ScreenPos> {
        cells.iter().map(|&(c, r)| ScreenPos::new(c, r)).collect()
    }

    #[test]
    fn glyph_blinker() {
        let mut frame = Frame::new(5, 3, DOTS);
        frame.draw(&positions(&[(1, 1), (2, 1), (3, 1)]));

        insta::assert_snapshot!(frame.render(), @r"
        .....
        .###.
        .....
        ");
    }

    #[test]
    fn out_of_frame_cells_are_ignored() {
        let mut frame = Frame::new(3, 2, DOTS);
        frame.draw(&positions(&[(0, 0), (3, 0), (0, 2), (100, 100)]));

        insta::assert_snapshot!(frame.render(), @r"
        #..
        ...
        ");
    }

    #[test]
    fn reset_and_resize_clear_the_frame() {
        let mut frame = Frame::new(2, 1, DOTS);
        frame.draw_cell(ScreenPos::new(1, 0));
        assert_eq!(frame.render(), ".#\n");

        frame.reset();
        assert_eq!(frame.render(), "..\n");

        frame.draw_cell(ScreenPos::new(0, 0));
        frame.resize(3, 1);
        assert_eq!(frame.render(), "...\n");
        assert_eq!((frame.width(), frame.height()), (3, 1));
    }

    #[test]
    fn braille_block() {
        let mut frame = Frame::new(2, 4, RenderMode::Braille);
        frame.draw(&positions(&[(0, 0), (1, 0), (0, 1), (1, 1)]));

        assert_eq!(frame.render(), "\u{281B}\n");
    }

    #[test]
    fn braille_glider() {
        let mut frame = Frame::new(4, 4, RenderMode::Braille);
        frame.draw(&positions(&[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]));

        // left char: (1, 0) -> 0x8, (0, 2) -> 0x4, (1, 2) -> 0x20
        // right char: (2, 1) -> 0x2, (2, 2) -> 0x4
        assert_eq!(frame.render(), "\u{282C}\u{2806}\n");
    }

    #[test]
    fn braille_rounds_partial_blocks_up() {
        let mut frame = Frame::new(3, 5, RenderMode::Braille);
        frame.draw_cell(ScreenPos::new(2, 4));

        assert_eq!(frame.render(), "\u{2800}\u{2800}\n\u{2800}\u{2801}\n");
    }

    #[test]
    fn empty_frame_renders_nothing() {
        let mut frame = Frame::new(0, 0, RenderMode::default());

        assert_eq!(frame.render(), "");
        assert_eq!(RenderMode::default().cells_per_char(), (1, 1));
        assert_eq!(RenderMode::Braille.cells_per_char(), (2, 4));
    }
}
