use std::io::{self, Write};

use crate::Frame;

/// Receiver of a finished frame.
pub trait Present {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Draws a downsampled frame with 24-bit ANSI colours, two pixel rows per
/// text line.
pub struct TerminalPreview<W: Write> {
    out: W,
    columns: usize,
}

impl<W: Write> TerminalPreview<W> {
    pub fn new(out: W, columns: usize) -> Self {
        Self {
            out,
            columns: columns.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Present for TerminalPreview<W> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let (width, height) = (frame.width(), frame.height());
        let columns = self.columns.min(width);
        // keep the aspect ratio, a text cell holds two pixel rows
        let rows = ((height * columns) as f64 / width as f64).round().max(1.0) as usize;

        let sample = |col: usize, row: usize| {
            frame
                .rgb(col * width / columns, row * height / rows)
                .unwrap_or([0, 0, 0])
        };

        for line in (0..rows).step_by(2) {
            for col in 0..columns {
                let [r, g, b] = sample(col, line);
                write!(self.out, "\x1b[38;2;{};{};{}m", r, g, b)?;
                if line + 1 < rows {
                    let [r, g, b] = sample(col, line + 1);
                    write!(self.out, "\x1b[48;2;{};{};{}m", r, g, b)?;
                } else {
                    write!(self.out, "\x1b[49m")?;
                }
                write!(self.out, "\u{2580}")?;
            }
            writeln!(self.out, "\x1b[0m")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Grid;

    fn frame(width: usize, height: usize) -> Frame {
        let mut frame = Frame::new(Grid::new(width, height).unwrap());
        {
            let writer = frame.writer();
            for index in 0..writer.len() {
                unsafe { writer.write(index, 0xff00_0000 | (index as u32) << 16) };
            }
        }
        frame
    }

    #[test]
    fn test_small_frame_is_drawn_at_full_size() {
        let mut preview = TerminalPreview::new(Vec::new(), 80);
        preview.present(&frame(2, 2)).unwrap();
        let text = String::from_utf8(preview.into_inner()).unwrap();

        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.matches('\u{2580}').count(), 2);
        assert!(text.starts_with("\x1b[38;2;0;0;0m\x1b[48;2;2;0;0m"));
        assert!(text.contains("\x1b[38;2;1;0;0m\x1b[48;2;3;0;0m"));
    }

    #[test]
    fn test_wide_frame_is_downsampled() {
        let mut preview = TerminalPreview::new(Vec::new(), 10);
        preview.present(&frame(100, 40)).unwrap();
        let text = String::from_utf8(preview.into_inner()).unwrap();

        // 10 columns by 4 pixel rows
        assert_eq!(text.lines().count(), 2);
        for line in text.lines() {
            assert_eq!(line.matches('\u{2580}').count(), 10);
        }
    }

    #[test]
    fn test_odd_row_count_uses_default_background() {
        let mut preview = TerminalPreview::new(Vec::new(), 3);
        preview.present(&frame(3, 3)).unwrap();
        let text = String::from_utf8(preview.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.lines().nth(1).unwrap().matches("\x1b[49m").count(), 3);
    }
}
