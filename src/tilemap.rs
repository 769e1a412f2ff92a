/// A dense row-major 2D grid holding one value per world tile.
///
/// The grid does not wrap: every coordinate outside
/// `0..width` x `0..height` is simply absent. The `*_signed` accessors take
/// possibly-negative offsets and return `None` (or ignore the write) instead of
/// panicking, which is what neighbor sampling and stamping rely on.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

/// 4-connected neighbor offsets (left, right, up, down).
pub const DIR4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 8-connected neighbor offsets, column-major starting at the upper left.
pub const DIR8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Whether a signed coordinate lies inside the grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Bounds-checked read at a signed coordinate.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.data[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    /// Bounds-checked write; out-of-range coordinates are ignored.
    pub fn set_signed(&mut self, x: i32, y: i32, value: T) {
        if self.contains(x, y) {
            let idx = self.index(x as usize, y as usize);
            self.data[idx] = value;
        }
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// In-bounds 4-connected neighbors.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offsets(x, y, &DIR4)
    }

    /// In-bounds 8-connected neighbors.
    pub fn neighbors_8(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offsets(x, y, &DIR8)
    }

    fn offsets<'a>(
        &'a self,
        x: usize,
        y: usize,
        dirs: &'a [(i32, i32)],
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        dirs.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            self.contains(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            (idx % width, idx / width, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            (idx % width, idx / width, val)
        })
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Number of cells matching a predicate.
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.data.iter().filter(|v| pred(v)).count()
    }
}

impl Tilemap<f32> {
    /// Minimum and maximum value in the grid.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min_v = f32::MAX;
        let mut max_v = f32::MIN;
        for &v in &self.data {
            if v < min_v { min_v = v; }
            if v > max_v { max_v = v; }
        }
        (min_v, max_v)
    }
}
