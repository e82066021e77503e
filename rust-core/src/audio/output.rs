//! Feature matrix output in the Kaldi float-matrix formats
//!
//! Binary: `\0B` marker, `FM `, then rows and columns each as a size byte (4)
//! plus a little-endian i32, then row-major little-endian f32 data.
//! Text: ` [`, one `\n  v v v ` line per row, closing `]` and newline.

use crate::error::IoError;
use ndarray::Array2;
use std::fs::File;
use std::io::{BufWriter, Write};

const BINARY_MARKER: &[u8] = b"\0B";

/// Write a matrix object (no binary marker)
pub fn write_matrix<W: Write + ?Sized>(
    writer: &mut W,
    matrix: &Array2<f64>,
    binary: bool,
) -> Result<(), IoError> {
    let (rows, cols) = matrix.dim();
    let io_error = |e| IoError::file("<matrix>", e);

    if binary {
        let too_large = || IoError::MatrixTooLarge { rows, cols };
        let rows_i32 = i32::try_from(rows).map_err(|_| too_large())?;
        let cols_i32 = i32::try_from(cols).map_err(|_| too_large())?;

        let mut buf = Vec::with_capacity(13 + 4 * rows * cols);
        buf.extend_from_slice(b"FM ");
        buf.push(4);
        buf.extend_from_slice(&rows_i32.to_le_bytes());
        buf.push(4);
        buf.extend_from_slice(&cols_i32.to_le_bytes());
        for &value in matrix.iter() {
            buf.extend_from_slice(&(value as f32).to_le_bytes());
        }
        writer.write_all(&buf).map_err(io_error)
    } else {
        let mut text = String::new();
        if rows == 0 || cols == 0 {
            text.push_str(" [ ]\n");
        } else {
            text.push_str(" [");
            for row in matrix.rows() {
                text.push_str("\n  ");
                for &value in row.iter() {
                    text.push_str(&(value as f32).to_string());
                    text.push(' ');
                }
            }
            text.push_str("]\n");
        }
        writer.write_all(text.as_bytes()).map_err(io_error)
    }
}

fn open_output(path: &str) -> Result<BufWriter<Box<dyn Write + Send>>, IoError> {
    let sink: Box<dyn Write + Send> = if path == "-" {
        Box::new(std::io::stdout())
    } else {
        Box::new(File::create(path).map_err(|e| IoError::file(path, e))?)
    };
    Ok(BufWriter::new(sink))
}

/// Write a single matrix to `path` (`-` for stdout)
pub fn write_matrix_file(path: &str, matrix: &Array2<f64>, binary: bool) -> Result<(), IoError> {
    let mut out = open_output(path)?;
    if binary {
        out.write_all(BINARY_MARKER).map_err(|e| IoError::file(path, e))?;
    }
    write_matrix(&mut out, matrix, binary)?;
    out.flush().map_err(|e| IoError::file(path, e))
}

/// Keyed feature archive writer
pub struct ArkWriter {
    out: BufWriter<Box<dyn Write + Send>>,
    path: String,
    binary: bool,
}

impl ArkWriter {
    /// Create (truncate) the archive at `path`; `-` writes to stdout
    pub fn create(path: &str, binary: bool) -> Result<Self, IoError> {
        Ok(Self {
            out: open_output(path)?,
            path: path.to_string(),
            binary,
        })
    }

    /// Append `<key> <matrix>`
    pub fn write(&mut self, key: &str, matrix: &Array2<f64>) -> Result<(), IoError> {
        let path = &self.path;
        self.out
            .write_all(key.as_bytes())
            .and_then(|_| self.out.write_all(b" "))
            .map_err(|e| IoError::file(path.as_str(), e))?;
        if self.binary {
            self.out
                .write_all(BINARY_MARKER)
                .map_err(|e| IoError::file(path.as_str(), e))?;
        }
        write_matrix(&mut self.out, matrix, self.binary)
    }

    /// Flush buffered entries
    pub fn finish(mut self) -> Result<(), IoError> {
        self.out.flush().map_err(|e| IoError::file(self.path.as_str(), e))
    }
}
