use async_trait::async_trait;

/// Synthesized audio plus the metadata needed to store it
#[derive(Debug, Clone)]
pub struct TtsAudio {
    pub data: Vec<u8>,
    pub extension: &'static str,
    pub content_type: &'static str,
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying engine (AWS Polly, a local model process, ...)
///
/// Implementations are responsible for:
/// - Handling engine-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single stream
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech
    ///
    /// Returns the merged audio data together with the file extension and
    /// content type it should be stored under.
    ///
    /// # Errors
    /// Returns an error message if synthesis fails or the engine is
    /// unavailable
    async fn synthesize(&self, text: &str) -> Result<TtsAudio, String>;
}
