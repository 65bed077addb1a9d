use super::tts_repository::{TtsAudio, TtsRepository};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// AWS Polly implementation of the TTS repository (the cloud engine)
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    voice: String,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, voice: String) -> Self {
        Self {
            polly_client,
            voice,
        }
    }

    /// Split text into batches that respect sentence boundaries.
    /// Each batch is at most MAX_BATCH_SIZE characters.
    fn split_into_batches(text: &str) -> Vec<String> {
        if text.len() <= MAX_BATCH_SIZE {
            return vec![text.to_string()];
        }

        let mut batches = Vec::new();
        let mut current_batch = String::new();

        let sentence_pattern = regex::Regex::new(r"([.!?]+\s+)").unwrap();
        let mut last_end = 0;

        for mat in sentence_pattern.find_iter(text) {
            let sentence = &text[last_end..mat.end()];

            if !current_batch.is_empty() && current_batch.len() + sentence.len() > MAX_BATCH_SIZE {
                batches.push(current_batch.trim().to_string());
                current_batch = String::new();
            }

            current_batch.push_str(sentence);
            last_end = mat.end();
        }

        // Text after the last sentence boundary
        if last_end < text.len() {
            let remaining = &text[last_end..];

            if !current_batch.is_empty() && current_batch.len() + remaining.len() > MAX_BATCH_SIZE {
                batches.push(current_batch.trim().to_string());
                current_batch = String::new();
            }

            if remaining.len() > MAX_BATCH_SIZE {
                // No sentence boundaries at all, fall back to raw chunks
                let chars: Vec<char> = remaining.chars().collect();
                for chunk in chars.chunks(MAX_BATCH_SIZE) {
                    batches.push(chunk.iter().collect());
                }
            } else {
                current_batch.push_str(remaining);
            }
        }

        if !current_batch.is_empty() {
            batches.push(current_batch.trim().to_string());
        }

        batches
    }

    /// Call AWS Polly for a single batch
    async fn call_polly(&self, text: &str) -> Result<Vec<u8>, String> {
        let voice_id = VoiceId::from(self.voice.as_str());

        tracing::debug!(
            voice = %self.voice,
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    voice = %self.voice,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {:?}", e)
            })?;

        let audio_stream = result
            .audio_stream
            .collect()
            .await
            .map_err(|e| format!("Failed to read audio stream: {}", e))?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str) -> Result<TtsAudio, String> {
        let start_time = std::time::Instant::now();

        let batches = Self::split_into_batches(text);
        tracing::info!(
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio_data = self.call_polly(batch).await?;
            merged_audio.extend(audio_data);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            latency_ms = duration.as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(TtsAudio {
            data: merged_audio,
            extension: "mp3",
            content_type: "audio/mpeg",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_small_text_is_single_batch() {
        let text = "This is a short text.";
        let batches = PollyTtsRepository::split_into_batches(text);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], text);
    }

    #[test]
    fn test_split_respects_max_size() {
        let sentence = "This is a sentence. ";
        let text = sentence.repeat(200); // > 3000 chars
        let batches = PollyTtsRepository::split_into_batches(&text);

        assert!(batches.len() > 1);
        for batch in &batches {
            assert!(
                batch.len() <= MAX_BATCH_SIZE,
                "Batch size {} exceeds MAX_BATCH_SIZE {}",
                batch.len(),
                MAX_BATCH_SIZE
            );
        }
    }

    #[test]
    fn test_split_without_punctuation_falls_back_to_chunks() {
        let text = "a".repeat(MAX_BATCH_SIZE + 500);
        let batches = PollyTtsRepository::split_into_batches(&text);

        assert!(batches.len() >= 2);
        for batch in &batches {
            assert!(batch.len() <= MAX_BATCH_SIZE);
        }
    }

    #[test]
    fn test_split_preserves_content() {
        let sentence = "This is sentence number X. ";
        let text = sentence.repeat(200);
        let batches = PollyTtsRepository::split_into_batches(&text);

        let reconstructed = batches.join(" ");
        let original_words = text.split_whitespace().count();
        let reconstructed_words = reconstructed.split_whitespace().count();
        assert_eq!(original_words, reconstructed_words);
    }

    #[test]
    fn test_split_exactly_max_size() {
        let text = "a".repeat(MAX_BATCH_SIZE);
        let batches = PollyTtsRepository::split_into_batches(&text);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), MAX_BATCH_SIZE);
    }
}
