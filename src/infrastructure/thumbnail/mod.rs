use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use uuid::Uuid;

/// ffmpeg is the only external call in the system with an explicit
/// timeout; a stuck extraction must not hold a request open indefinitely.
const FFMPEG_TIMEOUT: Duration = Duration::from_secs(30);

const FRAME_POSITION: &str = "00:00:01";
const THUMBNAIL_WIDTH: u32 = 480;

/// Extracts a single video frame with ffmpeg to use as a thumbnail
pub struct ThumbnailGenerator {
    width: u32,
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailGenerator {
    pub fn new() -> Self {
        Self {
            width: THUMBNAIL_WIDTH,
        }
    }

    /// Grab one frame from `video_path` as JPEG bytes.
    ///
    /// Scales to the configured width with the height following the aspect
    /// ratio. Errors are plain messages; callers treat thumbnail failure as
    /// non-fatal.
    pub async fn extract_frame(&self, video_path: &Path) -> Result<Vec<u8>, String> {
        let output_path =
            std::env::temp_dir().join(format!("thumb_{}.jpg", Uuid::new_v4().simple()));

        let run = Command::new("ffmpeg")
            .arg("-ss")
            .arg(FRAME_POSITION)
            .arg("-i")
            .arg(video_path)
            .arg("-vframes")
            .arg("1")
            .arg("-vf")
            .arg(format!("scale={}:-1", self.width))
            .arg("-q:v")
            .arg("2")
            .arg("-y")
            .arg(&output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        let output = match tokio::time::timeout(FFMPEG_TIMEOUT, run).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(format!("Failed to run ffmpeg: {}", e)),
            Err(_) => return Err("Thumbnail extraction timed out".to_string()),
        };

        if !output.status.success() {
            let stderr: String = String::from_utf8_lossy(&output.stderr)
                .chars()
                .take(500)
                .collect();
            return Err(format!("ffmpeg exited with {}: {}", output.status, stderr));
        }

        let bytes = tokio::fs::read(&output_path)
            .await
            .map_err(|e| format!("ffmpeg produced no thumbnail: {}", e))?;
        let _ = tokio::fs::remove_file(&output_path).await;

        tracing::debug!(
            video_path = %video_path.display(),
            thumbnail_bytes = bytes.len(),
            "Thumbnail extracted"
        );

        Ok(bytes)
    }
}
