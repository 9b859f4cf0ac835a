use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageFormat, RgbImage};
use ndarray::Array4;

use crate::caption::CaptionGenerator;
use crate::context::AppContext;
use crate::db::memory::MemoryAnalysisLog;
use crate::inference::{Classifier, InferenceError, InferenceModel, LabelSet};
use crate::storage::local::LocalContentStore;
use crate::storage::persistence::PersistenceSink;

pub const BOUNDARY: &str = "----inkpersona-test-boundary";

/// Returns the same scores for every input and remembers the last input.
pub struct FixedModel {
    output: Vec<f32>,
    last_input: Mutex<Option<Array4<f32>>>,
}

impl FixedModel {
    pub fn new(output: Vec<f32>) -> Self {
        Self {
            output,
            last_input: Mutex::new(None),
        }
    }

    pub fn last_input(&self) -> Option<Array4<f32>> {
        self.last_input.lock().unwrap().clone()
    }
}

impl InferenceModel for FixedModel {
    fn forward(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        *self.last_input.lock().unwrap() = Some(input.clone());
        Ok(self.output.clone())
    }
}

pub fn trait_labels() -> LabelSet {
    LabelSet::parse("Openness\nConscientiousness\nExtraversion\nAgreeableness\nNeuroticism")
        .unwrap()
}

pub fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn black_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgb8(RgbImage::new(width, height)))
}

/// Single-file `multipart/form-data` body; returns (content type, body).
pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub fn test_context(
    upload_dir: &Path,
    model: Option<Arc<FixedModel>>,
    log: Arc<MemoryAnalysisLog>,
    captions: CaptionGenerator,
) -> AppContext {
    let classifier = model.map(|m| Classifier::new(m, trait_labels()));
    AppContext {
        classifier,
        captions,
        persistence: PersistenceSink::new(
            Arc::new(LocalContentStore::new(upload_dir, "http://localhost:5000")),
            log,
        ),
        max_upload_bytes: 1024 * 1024,
    }
}
