//! fastText sentence encoder.
use std::path::Path;

use fasttext::FastText as FastTextLib;

use super::SentenceEncoder;
use crate::error::Error;

/// Sentence embeddings from a fastText `.bin` model
/// (`get_sentence_vector` over the model's word vectors).
pub struct FastTextEncoder {
    model: FastTextLib,
}

impl FastTextEncoder {
    /// Load a model from a `bin` file.
    ///
    /// # Errors
    /// Propagates model loading failures.
    pub fn from_path(filename: &Path) -> Result<Self, Error> {
        let mut model = FastTextLib::new();
        match filename.to_str() {
            None => Err(Error::Custom(format!(
                "invalid filepath for embedding model: {:?}",
                filename
            ))),
            Some(filename) => {
                model.load_model(filename).map_err(Error::FastText)?;
                Ok(Self { model })
            }
        }
    }
}

impl SentenceEncoder for FastTextEncoder {
    fn encode_batch(&self, sentences: &[&str]) -> Result<Vec<Vec<f32>>, Error> {
        sentences
            .iter()
            .map(|sentence| {
                // unicode null chars make fasttext error out
                let sentence = sentence.replace(char::from(0), "");
                self.model
                    .get_sentence_vector(&sentence)
                    .map_err(Error::FastText)
            })
            .collect()
    }
}
