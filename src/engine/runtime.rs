//! OpenVINO inference runtime
//!
//! Loads compiled models and exposes them through [`InferenceCapability`].
//! Inputs are NHWC `f32` tensors.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::{Array2, ArrayView3, ArrayViewD, Axis};
use openvino::{CompiledModel, Core, ElementType, Shape, Tensor};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::dispatch::InferenceCapability;
use crate::error::{DemographyError, Result};

/// OpenVINO core bound to one device
pub struct OpenVinoRuntime {
    core: Core,
    device: String,
}

impl OpenVinoRuntime {
    pub fn new(device: &str) -> Result<Self> {
        let core = Core::new().map_err(anyhow::Error::from)?;
        Ok(Self {
            core,
            device: device.to_string(),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Read and compile a model file.
    pub fn load(&mut self, path: &Path) -> Result<OpenVinoModel> {
        if !path.exists() {
            return Err(DemographyError::WeightsNotFound(path.to_path_buf()));
        }
        debug!("Model file found at: {}", path.display());

        let path_str = path.to_str().ok_or_else(|| DemographyError::InvalidInput {
            model: path.display().to_string(),
            reason: "model path is not valid UTF-8".to_string(),
        })?;

        info!("Loading model from {} on {}", path.display(), self.device);
        let start = Instant::now();

        let model = self
            .core
            .read_model_from_file(path_str, "")
            .map_err(anyhow::Error::from)?;
        let compiled = self
            .core
            .compile_model(&model, self.device.as_str().into())
            .map_err(anyhow::Error::from)?;

        info!("Model {} loaded in {:?}", path.display(), start.elapsed());

        Ok(OpenVinoModel {
            compiled: Mutex::new(compiled),
            path: path.to_path_buf(),
        })
    }
}

/// A compiled model ready for inference
pub struct OpenVinoModel {
    // Creating an infer request needs `&mut CompiledModel`.
    compiled: Mutex<CompiledModel>,
    path: PathBuf,
}

impl OpenVinoModel {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one request and return the output as `(dims[0], rest)`.
    fn run(&self, input: ArrayViewD<'_, f32>) -> anyhow::Result<Array2<f32>> {
        let dims: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let input_shape = Shape::new(&dims)?;
        let mut tensor = Tensor::new(ElementType::F32, &input_shape)?;

        let contiguous = input.as_standard_layout();
        let input_data = contiguous
            .as_slice()
            .ok_or_else(|| anyhow::anyhow!("input tensor is not contiguous"))?;
        tensor.get_data_mut::<f32>()?.copy_from_slice(input_data);

        let mut request = self.compiled.lock().create_infer_request()?;
        request.set_input_tensor(&tensor)?;
        request.infer()?;

        let output = request.get_output_tensor()?;
        let output_shape = output.get_shape()?;
        let output_dims: Vec<usize> = output_shape
            .get_dimensions()
            .iter()
            .map(|&d| d as usize)
            .collect();

        let rows = output_dims.first().copied().unwrap_or(1);
        let cols = output_dims.iter().skip(1).product::<usize>();
        let output_data = output.get_data::<f32>()?.to_vec();

        debug!(
            "{} output shape {:?} -> ({}, {})",
            self.path.display(),
            output_dims,
            rows,
            cols
        );

        Ok(Array2::from_shape_vec((rows, cols), output_data)?)
    }
}

impl InferenceCapability for OpenVinoModel {
    fn infer_single(&self, sample: ArrayView3<'_, f32>) -> anyhow::Result<Array2<f32>> {
        self.run(sample.insert_axis(Axis(0)).into_dyn())
    }

    fn infer_batch(&self, batch: ndarray::ArrayView4<'_, f32>) -> anyhow::Result<Array2<f32>> {
        self.run(batch.into_dyn())
    }
}
