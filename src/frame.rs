use std::marker::PhantomData;

use crate::Grid;

/// Row-major buffer of `0xAARRGGBB` cells.
///
/// Starts zeroed; every written cell is opaque, so a zero alpha marks a cell
/// that no worker has touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    grid: Grid,
    cells: Vec<u32>,
}

impl Frame {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![0; grid.len()],
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn get(&self, col: usize, row: usize) -> Option<u32> {
        if col >= self.grid.width() || row >= self.grid.height() {
            return None;
        }
        Some(self.cells[self.grid.index(col, row)])
    }

    /// Red, green and blue channels of a cell.
    pub fn rgb(&self, col: usize, row: usize) -> Option<[u8; 3]> {
        self.get(col, row)
            .map(|argb| [(argb >> 16) as u8, (argb >> 8) as u8, argb as u8])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    /// Whether every cell has been written.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&argb| argb >> 24 != 0)
    }

    /// Shared writer handed to the workers of one pass.
    pub fn writer(&mut self) -> FrameWriter<'_> {
        FrameWriter {
            ptr: self.cells.as_mut_ptr(),
            len: self.cells.len(),
            _marker: PhantomData,
        }
    }

    #[cfg(feature = "image")]
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let mut image_buf = image::RgbImage::new(self.width() as u32, self.height() as u32);
        for (index, &argb) in self.cells.iter().enumerate() {
            let (col, row) = self.grid.position(index);
            image_buf.put_pixel(
                col as u32,
                row as u32,
                image::Rgb([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8]),
            );
        }
        image_buf
    }
}

/// Lock-free write access to a [`Frame`] shared by several workers.
///
/// # Safety
/// No runtime check prevents two workers from writing the same cell. The
/// partition strategies hand out disjoint index ranges, which is the only
/// thing keeping concurrent writes race-free.
pub struct FrameWriter<'a> {
    ptr: *mut u32,
    len: usize,
    _marker: PhantomData<&'a mut [u32]>,
}

// SAFETY: writers only touch the cells assigned to them, and the partition
// strategies never assign a cell to two workers within one pass.
unsafe impl Send for FrameWriter<'_> {}
unsafe impl Sync for FrameWriter<'_> {}

#[allow(clippy::len_without_is_empty)]
impl<'a> FrameWriter<'a> {
    pub fn len(&self) -> usize {
        self.len
    }

    /// Second handle on the same cells, for handing one to each worker.
    pub(crate) fn share(&self) -> FrameWriter<'a> {
        FrameWriter {
            ptr: self.ptr,
            len: self.len,
            _marker: PhantomData,
        }
    }

    /// Store one cell.
    ///
    /// # Panics
    /// If `index` is outside the frame.
    ///
    /// # Safety
    /// No other thread may write `index` while this writer is alive.
    #[inline]
    pub unsafe fn write(&self, index: usize, argb: u32) {
        assert!(
            index < self.len,
            "cell {} outside frame of {} cells",
            index,
            self.len
        );
        self.ptr.add(index).write(argb);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_frame_is_blank() {
        let frame = Frame::new(Grid::new(3, 2).unwrap());
        assert_eq!(frame.as_slice().len(), 6);
        assert!(!frame.is_complete());
        assert_eq!(frame.get(2, 1), Some(0));
        assert_eq!(frame.get(3, 0), None);
        assert_eq!(frame.get(0, 2), None);
    }

    #[test]
    fn test_writer_fills_frame() {
        let mut frame = Frame::new(Grid::new(3, 2).unwrap());
        {
            let writer = frame.writer();
            for index in 0..writer.len() {
                unsafe { writer.write(index, 0xff00_0000 | index as u32) };
            }
        }
        assert!(frame.is_complete());
        assert_eq!(frame.get(1, 1), Some(0xff00_0004));
        assert_eq!(frame.rgb(2, 1), Some([0, 0, 5]));
    }

    #[test]
    fn test_disjoint_writes_from_threads() {
        let grid = Grid::new(16, 16).unwrap();
        let mut frame = Frame::new(grid);
        let writer = frame.writer();
        std::thread::scope(|s| {
            for half in 0..2 {
                let writer = &writer;
                s.spawn(move || {
                    for index in (half..grid.len()).step_by(2) {
                        unsafe { writer.write(index, 0xffff_ffff) };
                    }
                });
            }
        });
        assert!(frame.is_complete());
    }

    #[test]
    #[should_panic(expected = "outside frame")]
    fn test_write_out_of_bounds_panics() {
        let mut frame = Frame::new(Grid::new(2, 2).unwrap());
        let writer = frame.writer();
        unsafe { writer.write(4, 0xffff_ffff) };
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_to_rgb_image() {
        let mut frame = Frame::new(Grid::new(2, 1).unwrap());
        {
            let writer = frame.writer();
            unsafe {
                writer.write(0, 0xff10_2030);
                writer.write(1, 0xffff_0000);
            }
        }
        let image_buf = frame.to_rgb_image();
        assert_eq!(image_buf.dimensions(), (2, 1));
        assert_eq!(image_buf.get_pixel(0, 0).0, [0x10, 0x20, 0x30]);
        assert_eq!(image_buf.get_pixel(1, 0).0, [0xff, 0, 0]);
    }
}
