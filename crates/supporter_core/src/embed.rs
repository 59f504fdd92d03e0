use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SupporterError};

pub const DEFAULT_EMBEDDING_DIM: usize = 256;

/// Maps normalized text to a fixed-size vector. Providers are read-only
/// after construction; the expensive part (if any) happens once at load
/// time, so one provider can serve any number of callers.
pub trait EmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

impl EmbeddingProvider for Box<dyn EmbeddingProvider> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }
}

/// Cosine similarity in [-1, 1]. Empty or mismatched inputs and zero vectors
/// score 0.0 rather than failing, so degenerate text stays a defined miss.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

fn fnv1a(token: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in token.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Deterministic bag-of-tokens embedding: each whitespace token is FNV-1a
/// hashed into a bucket, the bucket counts are L2-normalized. No model
/// files, no network; identical text always embeds identically, which makes
/// it the default for tests and offline eval runs.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dim: usize,
}

impl HashEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(8) }
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl EmbeddingProvider for HashEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dim];
        for token in text.split_whitespace() {
            let bucket = (fnv1a(token) % self.dim as u64) as usize;
            vector[bucket] += 1.0;
        }
        l2_normalize(&mut vector);
        Ok(vector)
    }
}

/// Pretrained word vectors in the word2vec text format: an optional
/// `<count> <dim>` header line, then one `<token> <v1> <v2> ...` row per
/// line. The table is read once up front; lookups afterwards are in-memory
/// only.
pub struct WordVectorProvider {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl WordVectorProvider {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut vectors = HashMap::new();
        let mut dim = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(token) = fields.next() else { continue };

            let values: Vec<f32> = fields
                .map(str::parse)
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| {
                    SupporterError::Model(format!(
                        "{}:{}: non-numeric vector component",
                        path.display(),
                        line_no + 1
                    ))
                })?;

            // word2vec files open with a `<count> <dim>` header row
            if line_no == 0 && values.len() == 1 && token.parse::<usize>().is_ok() {
                continue;
            }

            if values.is_empty() {
                return Err(SupporterError::Model(format!(
                    "{}:{}: vector row without components",
                    path.display(),
                    line_no + 1
                )));
            }
            if dim == 0 {
                dim = values.len();
            } else if values.len() != dim {
                return Err(SupporterError::Model(format!(
                    "{}:{}: expected {dim} components, found {}",
                    path.display(),
                    line_no + 1,
                    values.len()
                )));
            }

            vectors.insert(token.to_lowercase(), values);
        }

        if vectors.is_empty() {
            return Err(SupporterError::Model(format!(
                "{}: no word vectors found",
                path.display()
            )));
        }

        tracing::debug!(vectors = vectors.len(), dim, "loaded word vector table");
        Ok(Self { vectors, dim })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl EmbeddingProvider for WordVectorProvider {
    /// Mean of the known tokens' vectors, L2-normalized. Unknown tokens are
    /// skipped; text with no known tokens embeds to the zero vector, which
    /// scores 0.0 against everything.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut acc = vec![0.0f32; self.dim];
        let mut count = 0usize;

        for token in text.split_whitespace() {
            if let Some(vector) = self.vectors.get(token) {
                for (slot, value) in acc.iter_mut().zip(vector) {
                    *slot += value;
                }
                count += 1;
            }
        }

        if count > 0 {
            for slot in acc.iter_mut() {
                *slot /= count as f32;
            }
            l2_normalize(&mut acc);
        }

        Ok(acc)
    }
}
