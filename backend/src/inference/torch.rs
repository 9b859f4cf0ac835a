use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use tch::{CModule, Device, Kind, Tensor};

use super::InferenceError;
use super::classifier::InferenceModel;

impl From<tch::TchError> for InferenceError {
    fn from(err: tch::TchError) -> Self {
        InferenceError::Model(err.to_string())
    }
}

/// TorchScript export of the handwriting model, fed NHWC batches.
pub struct TorchModel {
    module: Mutex<CModule>,
    device: Device,
}

impl TorchModel {
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(path, device).map_err(|e| InferenceError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::info!("Loaded TorchScript model {} on {:?}", path.display(), device);
        Ok(Self::from_module(module, device))
    }

    /// Switches the module to eval mode so dropout and batch-norm updates are off.
    pub fn from_module(mut module: CModule, device: Device) -> Self {
        module.set_eval();
        Self {
            module: Mutex::new(module),
            device,
        }
    }
}

impl InferenceModel for TorchModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let shape = input.shape();
        let dims = [
            shape[0] as i64,
            shape[1] as i64,
            shape[2] as i64,
            shape[3] as i64,
        ];
        let data = input
            .as_slice()
            .ok_or_else(|| InferenceError::Model("input tensor is not contiguous".into()))?;
        let tensor = Tensor::from_slice(data).view(dims).to_device(self.device);

        let module = self
            .module
            .lock()
            .map_err(|_| InferenceError::Model("model lock poisoned".into()))?;
        // Must not panic while the lock is held.
        let output = tch::no_grad(|| module.forward_ts(&[&tensor]))?;
        let output = output.to_kind(Kind::Float).to_device(Device::Cpu).view([-1]);

        let values = Vec::<f32>::try_from(&output)?;
        Ok(values)
    }
}
