use crate::geometry::Rect;

/// One bit per pixel: whether that pixel of a sprite is solid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width as usize * height as usize],
        }
    }

    /// Ellipse inscribed in the `width` x `height` box, sampled at pixel centres.
    pub fn ellipse(width: u32, height: u32) -> Self {
        let mut mask = Self::empty(width, height);
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        for y in 0..height {
            for x in 0..width {
                let nx = (x as f32 + 0.5 - rx) / rx;
                let ny = (y as f32 + 0.5 - ry) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from ascii rows: `#` or `X` is solid, anything else is empty.
    /// Rows shorter than the longest one are padded with empty pixels.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let height = rows.len() as u32;
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0) as u32;
        let mut mask = Self::empty(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                if ch == '#' || ch == 'X' {
                    mask.set(x as u32, y as u32, true);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.bits[idx] = solid;
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// First pixel solid in both masks when `other` is placed at `offset`
    /// relative to `self`. The point is in `self` coordinates.
    pub fn overlap(&self, other: &Mask, (dx, dy): (i32, i32)) -> Option<(u32, u32)> {
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (self.width as i32).min(dx + other.width as i32);
        let y_end = (self.height as i32).min(dy + other.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as u32, y as u32) && other.get((x - dx) as u32, (y - dy) as u32) {
                    return Some((x as u32, y as u32));
                }
            }
        }
        None
    }
}

/// Pixel-perfect test between two positioned masks.
pub fn collide_mask(a_rect: &Rect, a_mask: &Mask, b_rect: &Rect, b_mask: &Mask) -> bool {
    if !a_rect.intersects(b_rect) {
        return false;
    }
    a_mask
        .overlap(b_mask, (b_rect.x - a_rect.x, b_rect.y - a_rect.y))
        .is_some()
}
