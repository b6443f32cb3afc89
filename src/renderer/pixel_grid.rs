//! Monochrome frame buffer

/// A fixed-size grid of lit/unlit pixels, origin top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl PixelGrid {
    /// All-dark grid
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Light a pixel. Off-grid coordinates are clipped; returns whether
    /// anything was drawn.
    pub fn set(&mut self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = true;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.pixels[i])
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Coordinates of every lit pixel, row by row
    pub fn iter_lit(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(move |(i, _)| ((i % width) as i32, (i / width) as i32))
    }

    /// Pack into SSD1306 page order: one byte per column per 8-pixel page,
    /// least significant bit on top.
    pub fn to_page_buffer(&self) -> Vec<u8> {
        let width = self.width as usize;
        let pages = (self.height as usize).div_ceil(8);
        let mut buf = vec![0u8; width * pages];
        for (x, y) in self.iter_lit() {
            let (x, y) = (x as usize, y as usize);
            buf[(y / 8) * width + x] |= 1 << (y % 8);
        }
        buf
    }

    /// Text dump, `#` for lit and `.` for dark, one line per pixel row
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in self.pixels.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(|&p| if p { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut grid = PixelGrid::new(8, 4);
        assert!(grid.set(3, 2));
        assert!(grid.get(3, 2));
        assert!(!grid.get(2, 3));
        assert_eq!(grid.lit_count(), 1);
        assert_eq!(grid.iter_lit().collect::<Vec<_>>(), vec![(3, 2)]);

        grid.clear();
        assert_eq!(grid.lit_count(), 0);
    }

    #[test]
    fn test_off_grid_is_clipped() {
        let mut grid = PixelGrid::new(8, 4);
        assert!(!grid.set(-1, 0));
        assert!(!grid.set(0, -1));
        assert!(!grid.set(8, 0));
        assert!(!grid.set(0, 4));
        assert!(!grid.get(100, 100));
        assert_eq!(grid.lit_count(), 0);

        let mut empty = PixelGrid::new(0, 0);
        assert!(!empty.set(0, 0));
        assert_eq!(empty.to_ascii(), "");
    }

    #[test]
    fn test_page_buffer_layout() {
        let mut grid = PixelGrid::new(4, 16);
        grid.set(0, 0);
        grid.set(1, 7);
        grid.set(2, 8);
        grid.set(3, 15);

        let buf = grid.to_page_buffer();
        assert_eq!(buf.len(), 8);
        assert_eq!(buf[0], 0b0000_0001);
        assert_eq!(buf[1], 0b1000_0000);
        assert_eq!(buf[4 + 2], 0b0000_0001);
        assert_eq!(buf[4 + 3], 0b1000_0000);
    }

    #[test]
    fn test_partial_page_rounds_up() {
        let mut grid = PixelGrid::new(2, 10);
        grid.set(1, 9);
        let buf = grid.to_page_buffer();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf[2 + 1], 0b0000_0010);
    }

    #[test]
    fn test_ascii_dump() {
        let mut grid = PixelGrid::new(3, 2);
        grid.set(0, 0);
        grid.set(2, 1);
        assert_eq!(grid.to_ascii(), "#..\n..#\n");
    }
}
