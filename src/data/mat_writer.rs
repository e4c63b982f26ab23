//! Writes uncompressed MATLAB level-5 files for fixture trees.

use std::path::Path;

use ndarray::Array2;

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MX_DOUBLE_CLASS: u32 = 6;

/// Builds an uncompressed level-5 container of `double` arrays.
///
/// Only what fixture trees need: named real matrices, little-endian.
pub struct MatWriter {
    buf: Vec<u8>,
}

impl Default for MatWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MatWriter {
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(256);
        let mut text =
            b"MATLAB 5.0 MAT-file, Platform: rust, Created by: action-seg-datasets".to_vec();
        text.resize(116, b' ');
        buf.extend_from_slice(&text);
        buf.extend_from_slice(&[0u8; 8]);
        buf.extend_from_slice(&0x0100u16.to_le_bytes());
        buf.extend_from_slice(b"IM");
        Self { buf }
    }

    /// Add a matrix; stored column-major as MATLAB expects.
    pub fn matrix(mut self, name: &str, m: &Array2<f64>) -> Self {
        let (rows, cols) = m.dim();
        let data: Vec<f64> = m.t().iter().copied().collect();
        self.push_array(name, &[rows, cols], &data);
        self
    }

    /// Add a vector as a `1 x n` row.
    pub fn row(mut self, name: &str, v: &[f64]) -> Self {
        self.push_array(name, &[1, v.len()], v);
        self
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.buf)
    }

    fn push_array(&mut self, name: &str, dims: &[usize], data: &[f64]) {
        let mut body = Vec::new();

        put_tag(&mut body, MI_UINT32, 8);
        body.extend_from_slice(&MX_DOUBLE_CLASS.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());

        put_tag(&mut body, MI_INT32, (dims.len() * 4) as u32);
        for &d in dims {
            body.extend_from_slice(&(d as i32).to_le_bytes());
        }
        pad8(&mut body);

        put_tag(&mut body, MI_INT8, name.len() as u32);
        body.extend_from_slice(name.as_bytes());
        pad8(&mut body);

        put_tag(&mut body, MI_DOUBLE, (data.len() * 8) as u32);
        for v in data {
            body.extend_from_slice(&v.to_le_bytes());
        }

        put_tag(&mut self.buf, MI_MATRIX, body.len() as u32);
        self.buf.extend_from_slice(&body);
    }
}

fn put_tag(buf: &mut Vec<u8>, ty: u32, len: u32) {
    buf.extend_from_slice(&ty.to_le_bytes());
    buf.extend_from_slice(&len.to_le_bytes());
}

fn pad8(buf: &mut Vec<u8>) {
    while buf.len() % 8 != 0 {
        buf.push(0);
    }
}
