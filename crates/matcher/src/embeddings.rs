use crate::error::{MatcherError, Result};
use async_trait::async_trait;
use ndarray::{Array, Axis, Ix2, Ix3};
use ort::execution_providers::{CPUExecutionProvider, ExecutionProvider};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputs};
use ort::value::{DynTensor, Tensor};
use ort::Error as OrtError;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tokio::task::spawn_blocking;

/// Output width of the sentence-transformer (all-MiniLM-L6-v2). The stub
/// backend produces vectors of the same width so both backends are
/// interchangeable.
pub const EMBEDDING_DIMENSION: usize = 384;

const MAX_LENGTH: usize = 256;
const MAX_BATCH: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EmbeddingMode {
    Fast,
    Stub,
}

impl EmbeddingMode {
    fn from_env() -> Result<Self> {
        let raw = env::var("ADVISOR_EMBEDDING_MODE")
            .unwrap_or_else(|_| "fast".to_string())
            .to_ascii_lowercase();
        match raw.as_str() {
            "fast" => Ok(Self::Fast),
            "stub" => Ok(Self::Stub),
            other => Err(MatcherError::EmbeddingError(format!(
                "Unsupported ADVISOR_EMBEDDING_MODE '{other}' (expected 'fast' or 'stub')"
            ))),
        }
    }
}

/// Model asset directory: `ADVISOR_MODEL_DIR` or `./models`. The directory
/// is expected to hold `model.onnx` and `tokenizer.json`.
pub fn model_dir() -> PathBuf {
    env::var("ADVISOR_MODEL_DIR").map_or_else(|_| PathBuf::from("models"), PathBuf::from)
}

/// Frozen text-embedding function: deterministic for a fixed backend and
/// input. The trait is the seam the advisor core is tested through.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;
}

struct OrtBackend {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

impl OrtBackend {
    fn new(dir: &Path) -> Result<Self> {
        let model_path = dir.join("model.onnx");
        let tokenizer_path = dir.join("tokenizer.json");
        if !model_path.exists() || !tokenizer_path.exists() {
            return Err(MatcherError::EmbeddingError(format!(
                "Model files are missing. Expected ONNX at {} and tokenizer at {} (set ADVISOR_MODEL_DIR, or ADVISOR_EMBEDDING_MODE=stub for hash embeddings).",
                model_path.display(),
                tokenizer_path.display(),
            )));
        }

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| MatcherError::EmbeddingError(format!("Tokenizer load failed: {e}")))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..PaddingParams::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_LENGTH,
                ..TruncationParams::default()
            }))
            .map_err(|e| {
                MatcherError::EmbeddingError(format!("Tokenizer truncation failed: {e}"))
            })?;

        let session = Session::builder()
            .map_err(|e| MatcherError::EmbeddingError(format!("{e}")))?
            .with_intra_threads(2)
            .map_err(|e| {
                MatcherError::EmbeddingError(format!("Failed to set ORT intra threads: {e}"))
            })?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(|e| {
                MatcherError::EmbeddingError(format!(
                    "Failed to register CPU execution provider: {e}"
                ))
            })?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| {
                MatcherError::EmbeddingError(format!("Failed to set optimization level: {e}"))
            })?
            .commit_from_file(&model_path)
            .map_err(|e| MatcherError::EmbeddingError(format!("Failed to load ONNX model: {e}")))?;

        log::info!(
            "Loaded ONNX embedding model from {} (dim {}, max_length {}, batch {})",
            dir.display(),
            EMBEDDING_DIMENSION,
            MAX_LENGTH,
            MAX_BATCH
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    fn embed_batch_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            let encodings = self
                .tokenizer
                .encode_batch(batch.to_vec(), true)
                .map_err(|e| MatcherError::EmbeddingError(format!("Tokenization failed: {e}")))?;

            if encodings.is_empty() {
                continue;
            }

            let seq_len = encodings[0].len();
            if encodings.iter().any(|e| e.len() != seq_len) {
                return Err(MatcherError::EmbeddingError(
                    "Inconsistent sequence lengths after padding".to_string(),
                ));
            }
            let (ids, masks, type_ids, mask_rows) = build_flat_tensors(&encodings, seq_len);

            let ids_array = Array::from_shape_vec((batch.len(), seq_len), ids)
                .map_err(|e| MatcherError::EmbeddingError(format!("IDs shape error: {e}")))?;
            let mask_array = Array::from_shape_vec((batch.len(), seq_len), masks)
                .map_err(|e| MatcherError::EmbeddingError(format!("Mask shape error: {e}")))?;
            let type_array = Array::from_shape_vec((batch.len(), seq_len), type_ids)
                .map_err(|e| MatcherError::EmbeddingError(format!("Types shape error: {e}")))?;

            let ids_tensor = Tensor::from_array(ids_array.into_dyn())
                .map_err(|e| to_embedding_error(&e))?
                .upcast();
            let mask_tensor = Tensor::from_array(mask_array.into_dyn())
                .map_err(|e| to_embedding_error(&e))?
                .upcast();
            let type_tensor = Tensor::from_array(type_array.into_dyn())
                .map_err(|e| to_embedding_error(&e))?
                .upcast();

            let array = {
                let mut session = self.session.lock().map_err(|_| {
                    MatcherError::EmbeddingError("Failed to lock ONNX session".into())
                })?;

                let mut available: HashMap<String, DynTensor> = HashMap::new();
                available.insert("input_ids".to_string(), ids_tensor);
                available.insert("attention_mask".to_string(), mask_tensor);
                available.insert("token_type_ids".to_string(), type_tensor);

                let mut feed: HashMap<String, DynTensor> = HashMap::new();
                for input in &session.inputs {
                    let key = input.name.clone();
                    let Some(value) = available.get(&key) else {
                        return Err(MatcherError::EmbeddingError(format!(
                            "Unsupported ONNX input '{key}' (expected input_ids, attention_mask, token_type_ids)"
                        )));
                    };
                    feed.insert(key, value.clone());
                }

                let outputs = session.run(SessionInputs::from(feed)).map_err(|e| {
                    MatcherError::EmbeddingError(format!("ONNX forward failed: {e}"))
                })?;

                if outputs.len() == 0 {
                    return Err(MatcherError::EmbeddingError(
                        "ONNX returned no outputs".to_string(),
                    ));
                }

                outputs[0]
                    .try_extract_array::<f32>()
                    .map_err(|e| {
                        MatcherError::EmbeddingError(format!("Failed to decode ONNX output: {e}"))
                    })?
                    .to_owned()
            };
            results.extend(embeddings_from_output(array, &mask_rows)?);
        }

        Ok(results)
    }
}

#[derive(Clone, Copy)]
struct StubBackend;

impl StubBackend {
    fn embed_batch(self, texts: &[String]) -> Vec<Vec<f32>> {
        texts
            .iter()
            .map(|text| stub_embed(text, EMBEDDING_DIMENSION))
            .collect()
    }
}

fn embeddings_from_output(
    array: ndarray::ArrayD<f32>,
    mask_rows: &[Vec<i64>],
) -> Result<Vec<Vec<f32>>> {
    let mut out = Vec::new();
    match array.ndim() {
        2 => {
            let embeddings = array
                .into_dimensionality::<Ix2>()
                .map_err(|e| MatcherError::EmbeddingError(format!("Bad output shape: {e}")))?;
            out.reserve(embeddings.len_of(Axis(0)));
            for row in embeddings.outer_iter() {
                let mut emb = row.to_owned().to_vec();
                ensure_dimension(&emb)?;
                normalize(&mut emb);
                out.push(emb);
            }
        }
        3 => {
            let hidden = array
                .into_dimensionality::<Ix3>()
                .map_err(|e| MatcherError::EmbeddingError(format!("Bad output shape: {e}")))?;
            out.reserve(hidden.len_of(Axis(0)));
            for (idx, sample) in hidden.outer_iter().enumerate() {
                let attn = mask_rows
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| vec![1; sample.len_of(Axis(0))]);
                let mut emb = mean_pool(sample.view(), &attn);
                ensure_dimension(&emb)?;
                normalize(&mut emb);
                out.push(emb);
            }
        }
        _ => {
            return Err(MatcherError::EmbeddingError(format!(
                "Unexpected ONNX output dims: {:?}",
                array.shape()
            )));
        }
    }
    Ok(out)
}

const fn ensure_dimension(vec: &[f32]) -> Result<()> {
    if vec.len() != EMBEDDING_DIMENSION {
        return Err(MatcherError::InvalidDimension {
            expected: EMBEDDING_DIMENSION,
            actual: vec.len(),
        });
    }
    Ok(())
}

fn mean_pool(sample: ndarray::ArrayView2<'_, f32>, mask: &[i64]) -> Vec<f32> {
    if sample.is_empty() {
        return vec![];
    }

    let hidden = sample.len_of(Axis(1));
    let mut sum = vec![0.0f32; hidden];
    let mut count = 0.0f32;

    for (token_idx, token) in sample.outer_iter().enumerate() {
        if *mask.get(token_idx).unwrap_or(&0) == 0 {
            continue;
        }
        count += 1.0;
        for (dim, value) in token.iter().enumerate() {
            sum[dim] += value;
        }
    }

    if count == 0.0 {
        return sum;
    }

    for value in &mut sum {
        *value /= count;
    }

    sum
}

fn build_flat_tensors(
    encodings: &[Encoding],
    seq_len: usize,
) -> (Vec<i64>, Vec<i64>, Vec<i64>, Vec<Vec<i64>>) {
    let mut ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut masks = Vec::with_capacity(encodings.len() * seq_len);
    let mut type_ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut mask_rows = Vec::with_capacity(encodings.len());

    for encoding in encodings {
        let encoding_ids = encoding.get_ids();
        let encoding_masks = encoding.get_attention_mask();
        let encoding_types = encoding.get_type_ids();

        for idx in 0..seq_len {
            ids.push(i64::from(*encoding_ids.get(idx).unwrap_or(&0)));
            masks.push(i64::from(*encoding_masks.get(idx).unwrap_or(&0)));
            type_ids.push(i64::from(*encoding_types.get(idx).unwrap_or(&0)));
        }

        mask_rows.push(
            encoding_masks
                .iter()
                .take(seq_len)
                .map(|v| i64::from(*v))
                .collect(),
        );
    }

    (ids, masks, type_ids, mask_rows)
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn to_embedding_error(error: &OrtError) -> MatcherError {
    MatcherError::EmbeddingError(format!("{error}"))
}

/// Cosine similarity: dot product over the product of magnitudes. Returns
/// 0.0 for mismatched lengths or zero-magnitude inputs.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// The embedding model used by the matcher. Inference runs on a blocking
/// thread; the ONNX session itself is not safe for concurrent use and is
/// guarded by its own mutex.
pub struct EmbeddingModel {
    backend: EmbeddingBackend,
}

enum EmbeddingBackend {
    Ort(Arc<OrtBackend>),
    Stub(StubBackend),
}

impl EmbeddingModel {
    /// Builds the backend selected by `ADVISOR_EMBEDDING_MODE`, loading
    /// model assets from [`model_dir`] in fast mode.
    pub fn from_env() -> Result<Self> {
        match EmbeddingMode::from_env()? {
            EmbeddingMode::Stub => Ok(Self::new_stub()),
            EmbeddingMode::Fast => {
                let backend = OrtBackend::new(&model_dir())?;
                Ok(Self {
                    backend: EmbeddingBackend::Ort(Arc::new(backend)),
                })
            }
        }
    }

    /// Deterministic hash-vector backend; no model assets required.
    #[must_use]
    pub const fn new_stub() -> Self {
        Self {
            backend: EmbeddingBackend::Stub(StubBackend),
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| MatcherError::EmbeddingError("Empty embedding result".to_string()))
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let owned: Vec<String> = texts.into_iter().map(ToString::to_string).collect();
        match &self.backend {
            EmbeddingBackend::Stub(stub) => Ok(stub.embed_batch(&owned)),
            EmbeddingBackend::Ort(backend) => {
                let backend = backend.clone();
                spawn_blocking(move || backend.embed_batch_blocking(&owned))
                    .await
                    .map_err(|e| MatcherError::EmbeddingError(format!("Join error: {e}")))?
            }
        }
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cosine_similarity_identity_and_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);

        let c = vec![1.0, 0.0];
        let d = vec![0.0, 1.0];
        assert!(cosine_similarity(&c, &d).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_guards_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn stub_embeddings_are_deterministic_and_normalized() {
        let a = stub_embed("how to find internships", EMBEDDING_DIMENSION);
        let b = stub_embed("how to find internships", EMBEDDING_DIMENSION);
        assert_eq!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIMENSION);

        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);

        let other = stub_embed("a different question", EMBEDDING_DIMENSION);
        assert_ne!(a, other);
    }

    #[tokio::test]
    async fn stub_model_embeds_batches() {
        let model = EmbeddingModel::new_stub();
        let vectors = model
            .embed_batch(vec!["resume tips", "portfolio advice"])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        for vector in &vectors {
            assert_eq!(vector.len(), model.dimension());
        }
    }

    #[test]
    fn mean_pool_ignores_masked_tokens() {
        let sample = ndarray::array![[2.0f32, 4.0], [100.0, 100.0]];
        let pooled = mean_pool(sample.view(), &[1, 0]);
        assert_eq!(pooled, vec![2.0, 4.0]);
    }
}
