//! Tokenizer resolution and truncating encode

use crate::family::ModelFamily;
use std::path::Path;
use textclf_core::{Error, Result};
use tokenizers::{Encoding, Tokenizer, TruncationDirection, TruncationParams};

/// Fewest tokens a truncated sequence can hold: `[CLS]` and `[SEP]`
pub const MIN_MAX_LENGTH: usize = 2;

/// Load the tokenizer that pairs with the artifact.
///
/// Resolution order: `tokenizer.json` in the artifact directory, then
/// `vocab.txt` assembled as a BERT WordPiece pipeline, then the family's
/// base tokenizer from the HuggingFace Hub. The returned tokenizer truncates
/// to `max_length` tokens and never pads.
pub fn load_tokenizer(model_dir: &Path, family: ModelFamily, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = resolve_tokenizer(model_dir, family)?;
    configure_truncation(&mut tokenizer, max_length)?;
    Ok(tokenizer)
}

fn resolve_tokenizer(model_dir: &Path, family: ModelFamily) -> Result<Tokenizer> {
    let tokenizer_json_path = model_dir.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from {}", tokenizer_json_path.display());
        return Tokenizer::from_file(&tokenizer_json_path)
            .map_err(|e| Error::tokenizer(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab_path = model_dir.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building WordPiece tokenizer from {}", vocab_path.display());
        return wordpiece_from_vocab(&vocab_path);
    }

    tracing::info!(
        "No tokenizer files in {}, fetching base tokenizer '{}'",
        model_dir.display(),
        family.base_tokenizer_repo()
    );
    download_base_tokenizer(family)
}

/// Assemble a lowercasing BERT tokenizer from a WordPiece vocabulary file
pub fn wordpiece_from_vocab(vocab_path: &Path) -> Result<Tokenizer> {
    use tokenizers::models::wordpiece::WordPiece;
    use tokenizers::normalizers::BertNormalizer;
    use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
    use tokenizers::processors::bert::BertProcessing;

    let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| Error::tokenizer(format!("Failed to build WordPiece model: {}", e)))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(Some(BertNormalizer::default()));
    tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));

    let special = |token: &str, fallback: u32| {
        let id = tokenizer.token_to_id(token).unwrap_or(fallback);
        (token.to_string(), id)
    };
    let sep = special("[SEP]", 102);
    let cls = special("[CLS]", 101);
    tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));

    Ok(tokenizer)
}

fn download_base_tokenizer(family: ModelFamily) -> Result<Tokenizer> {
    let repo = family.base_tokenizer_repo();

    let api = hf_hub::api::sync::Api::new()
        .map_err(|e| Error::tokenizer(format!("Failed to initialize HuggingFace API: {}", e)))?;
    let path = api
        .repo(hf_hub::Repo::model(repo.to_string()))
        .get("tokenizer.json")
        .map_err(|e| {
            Error::tokenizer(format!("Failed to download tokenizer for '{}': {}", repo, e))
        })?;

    Tokenizer::from_file(&path)
        .map_err(|e| Error::tokenizer(format!("Failed to load tokenizer for '{}': {}", repo, e)))
}

/// Truncate on the right to `max_length` tokens, special tokens included
pub fn configure_truncation(tokenizer: &mut Tokenizer, max_length: usize) -> Result<()> {
    if max_length < MIN_MAX_LENGTH {
        return Err(Error::config(format!(
            "max_length must be at least {}, got {}",
            MIN_MAX_LENGTH, max_length
        )));
    }

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            direction: TruncationDirection::Right,
            ..Default::default()
        }))
        .map_err(|e| Error::tokenizer(format!("Failed to configure truncation: {}", e)))?;
    tokenizer.with_padding(None);

    Ok(())
}

/// Encode a single sequence with special tokens
pub fn encode(tokenizer: &Tokenizer, text: &str) -> Result<Encoding> {
    tokenizer
        .encode(text, true)
        .map_err(|e| Error::tokenizer(format!("Tokenization failed: {}", e)))
}
