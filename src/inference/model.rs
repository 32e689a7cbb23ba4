use std::sync::{Arc, Mutex};

use tch::nn::ModuleT;
use tch::{CModule, Device, Kind};
use thiserror::Error;

use crate::config::ModelVariant;
use crate::inference::preprocess::preprocess;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("model execution failed: {0}")]
    Model(#[from] tch::TchError),
    #[error("model produced an empty output")]
    EmptyOutput,
}

/// TorchScript classifier loaded once at startup and shared read-only across
/// requests. The quantized mobile export only runs on CPU; the full export
/// takes CUDA when available.
#[derive(Clone)]
pub struct PlantModel {
    module: Arc<Mutex<CModule>>,
    device: Device,
}

impl PlantModel {
    pub fn load(variant: ModelVariant, model_path: &str) -> Result<Self, InferenceError> {
        let device = match variant {
            ModelVariant::Full => Device::cuda_if_available(),
            ModelVariant::Quantized => Device::Cpu,
        };
        let module = CModule::load_on_device(model_path, device)?;
        Ok(Self {
            module: Arc::new(Mutex::new(module)),
            device,
        })
    }

    /// Decode, preprocess and forward one image; returns the per-class
    /// probability vector in training-index order.
    pub fn infer(&self, image: &[u8]) -> Result<Vec<f32>, InferenceError> {
        let input = preprocess(image)?.to_device(self.device);
        let output = tch::no_grad(|| self.module.lock().unwrap().forward_t(&input, false));
        let output = output.softmax(-1, Kind::Float);
        let flat = output.to_kind(Kind::Float).view([-1]);

        let num_elements = flat.size()[0] as usize;
        if num_elements == 0 {
            return Err(InferenceError::EmptyOutput);
        }
        let mut scores = vec![0.0f32; num_elements];
        flat.copy_data(&mut scores, num_elements);
        Ok(scores)
    }
}

/// Index of the highest score, first one winning ties. `None` on empty input.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_highest_score() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.9]), Some(0));
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some(0));
    }

    #[test]
    fn argmax_of_empty_output_is_none() {
        assert_eq!(argmax(&[]), None);
    }
}
