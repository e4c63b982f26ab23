use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use matfile::{MatFile, NumericData};
use ndarray::{Array1, Array2, ArrayD, Ix2, IxDyn, ShapeBuilder};

use crate::error::{DatasetError, Result};

/// A parsed MATLAB level-5 container.
pub struct MatContents {
    path: PathBuf,
    file: MatFile,
}

impl MatContents {
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = MatFile::parse(BufReader::new(f)).map_err(|e| DatasetError::MatFile {
            path: path.to_path_buf(),
            message: format!("{e:?}"),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Field `name` in its logical (row-major) shape, widened to `f64`.
    fn field(&self, name: &str) -> Result<ArrayD<f64>> {
        let array = self
            .file
            .find_by_name(name)
            .ok_or_else(|| DatasetError::MissingField {
                path: self.path.clone(),
                field: name.to_string(),
            })?;

        // MATLAB stores column-major.
        let shape = IxDyn(array.size()).f();
        ArrayD::from_shape_vec(shape, widen(array.data())).map_err(|_| DatasetError::BadShape {
            path: self.path.clone(),
            field: name.to_string(),
            shape: array.size().clone(),
        })
    }

    /// A 2-D field as a matrix.
    pub fn matrix(&self, name: &str) -> Result<Array2<f64>> {
        let array = self.field(name)?;
        let shape = array.shape().to_vec();
        array
            .into_dimensionality::<Ix2>()
            .map_err(|_| DatasetError::BadShape {
                path: self.path.clone(),
                field: name.to_string(),
                shape,
            })
    }

    /// Any field flattened in row-major order.
    pub fn flat(&self, name: &str) -> Result<Array1<f64>> {
        let array = self.field(name)?;
        Ok(Array1::from_iter(array.iter().copied()))
    }
}

fn widen(data: &NumericData) -> Vec<f64> {
    fn cast<T: Copy + Into<f64>>(v: &[T]) -> Vec<f64> {
        v.iter().map(|&x| x.into()).collect()
    }

    #[allow(unreachable_patterns)]
    match data {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => cast(real.as_slice()),
        NumericData::Int8 { real, .. } => cast(real.as_slice()),
        NumericData::UInt8 { real, .. } => cast(real.as_slice()),
        NumericData::Int16 { real, .. } => cast(real.as_slice()),
        NumericData::UInt16 { real, .. } => cast(real.as_slice()),
        NumericData::Int32 { real, .. } => cast(real.as_slice()),
        NumericData::UInt32 { real, .. } => cast(real.as_slice()),
        NumericData::Int64 { real, .. } => real.iter().map(|&x| x as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&x| x as f64).collect(),
        _ => Vec::new(),
    }
}
