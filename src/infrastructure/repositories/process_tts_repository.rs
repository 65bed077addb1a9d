use super::tts_repository::{TtsAudio, TtsRepository};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uuid::Uuid;

/// Local TTS engine driven as an external process (piper-style CLI).
///
/// The engine reads text from stdin and writes a WAV file to the path given
/// with `--output_file`. No timeout is enforced; synthesis time scales with
/// input length.
pub struct ProcessTtsRepository {
    command: String,
    model: Option<String>,
}

impl ProcessTtsRepository {
    pub fn new(command: String, model: Option<String>) -> Self {
        Self { command, model }
    }

    fn output_path() -> PathBuf {
        std::env::temp_dir().join(format!("tts_{}.wav", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl TtsRepository for ProcessTtsRepository {
    async fn synthesize(&self, text: &str) -> Result<TtsAudio, String> {
        let output_path = Self::output_path();
        let start_time = std::time::Instant::now();

        let mut command = Command::new(&self.command);
        if let Some(model) = &self.model {
            command.arg("--model").arg(model);
        }
        command
            .arg("--output_file")
            .arg(&output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        tracing::info!(
            command = %self.command,
            text_length = text.len(),
            "Starting local TTS process"
        );

        let mut child = command
            .spawn()
            .map_err(|e| format!("Failed to start TTS engine '{}': {}", self.command, e))?;

        // stdin must be closed for the engine to start synthesizing
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| "TTS engine stdin unavailable".to_string())?;
        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|e| format!("Failed to write text to TTS engine: {}", e))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("TTS engine failed: {}", e))?;

        if !output.status.success() {
            let stderr: String = String::from_utf8_lossy(&output.stderr)
                .chars()
                .take(500)
                .collect();
            return Err(format!("TTS engine exited with {}: {}", output.status, stderr));
        }

        let data = tokio::fs::read(&output_path)
            .await
            .map_err(|e| format!("TTS engine produced no output file: {}", e))?;
        let _ = tokio::fs::remove_file(&output_path).await;

        tracing::info!(
            provider = "local",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = data.len(),
            "TTS synthesis completed"
        );

        Ok(TtsAudio {
            data,
            extension: "wav",
            content_type: "audio/wav",
        })
    }
}
