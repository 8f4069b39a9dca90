//! Mock inference capabilities for unit tests

use std::cell::RefCell;

use ndarray::{Array1, Array2, ArrayView3, ArrayView4, Axis};

use super::dispatch::InferenceCapability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPath {
    Single,
    Batch,
}

/// Records every call and answers with values derived from the input,
/// so single and batch results for the same image agree.
#[derive(Debug)]
pub struct RecordingCapability {
    classes: usize,
    calls: RefCell<Vec<CallPath>>,
    shapes: RefCell<Vec<Vec<usize>>>,
    empty_single: bool,
    failure: Option<String>,
}

impl RecordingCapability {
    pub fn new(classes: usize) -> Self {
        Self {
            classes,
            calls: RefCell::new(Vec::new()),
            shapes: RefCell::new(Vec::new()),
            empty_single: false,
            failure: None,
        }
    }

    pub fn with_empty_single_output(mut self) -> Self {
        self.empty_single = true;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CallPath> {
        self.calls.borrow().clone()
    }

    pub fn last_shape(&self) -> Option<Vec<usize>> {
        self.shapes.borrow().last().cloned()
    }

    fn row_for(&self, sample: ArrayView3<'_, f32>) -> Vec<f32> {
        let sum = sample.sum();
        (0..self.classes).map(|k| sum + k as f32).collect()
    }

    fn record(&self, path: CallPath, shape: &[usize]) -> anyhow::Result<()> {
        self.calls.borrow_mut().push(path);
        self.shapes.borrow_mut().push(shape.to_vec());
        match &self.failure {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

impl InferenceCapability for RecordingCapability {
    fn infer_single(&self, sample: ArrayView3<'_, f32>) -> anyhow::Result<Array2<f32>> {
        self.record(CallPath::Single, sample.shape())?;
        if self.empty_single {
            return Ok(Array2::zeros((0, self.classes)));
        }
        Ok(Array2::from_shape_vec((1, self.classes), self.row_for(sample))?)
    }

    fn infer_batch(&self, batch: ArrayView4<'_, f32>) -> anyhow::Result<Array2<f32>> {
        self.record(CallPath::Batch, batch.shape())?;
        let rows: Vec<f32> = batch
            .axis_iter(Axis(0))
            .flat_map(|sample| self.row_for(sample))
            .collect();
        Ok(Array2::from_shape_vec((batch.len_of(Axis(0)), self.classes), rows)?)
    }
}

/// Returns the same probability row for every sample.
#[derive(Debug)]
pub struct ConstantCapability {
    row: Array1<f32>,
    shapes: RefCell<Vec<Vec<usize>>>,
}

impl ConstantCapability {
    pub fn new(row: Vec<f32>) -> Self {
        Self {
            row: Array1::from(row),
            shapes: RefCell::new(Vec::new()),
        }
    }

    pub fn shapes(&self) -> Vec<Vec<usize>> {
        self.shapes.borrow().clone()
    }

    fn rows(&self, n: usize) -> Array2<f32> {
        let mut out = Array2::zeros((n, self.row.len()));
        for mut row in out.rows_mut() {
            row.assign(&self.row);
        }
        out
    }
}

impl InferenceCapability for ConstantCapability {
    fn infer_single(&self, sample: ArrayView3<'_, f32>) -> anyhow::Result<Array2<f32>> {
        self.shapes.borrow_mut().push(sample.shape().to_vec());
        Ok(self.rows(1))
    }

    fn infer_batch(&self, batch: ArrayView4<'_, f32>) -> anyhow::Result<Array2<f32>> {
        self.shapes.borrow_mut().push(batch.shape().to_vec());
        Ok(self.rows(batch.len_of(Axis(0))))
    }
}
