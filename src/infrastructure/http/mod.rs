pub mod request_id;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{audio::AudioController, health, video::VideoController};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use request_id::request_id_middleware;

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    audio_controller: Arc<AudioController>,
    video_controller: Arc<VideoController>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Audio routes
    let audio_routes = Router::new()
        .route("/api/get-audio-url/", post(AudioController::get_audio_url))
        .route("/api/upload-audio/", post(AudioController::upload_audio))
        .route("/api/record/:recordId/", get(AudioController::record_detail))
        .route("/api/record/:recordId/renew/", post(AudioController::renew_record))
        .route("/api/record/:recordId/delete/", post(AudioController::delete_record))
        .route("/api/records/", get(AudioController::record_list))
        .with_state(audio_controller);

    // Video routes; the multipart upload needs a body limit far above
    // axum's 2 MB default
    let video_routes = Router::new()
        .route("/api/upload-video/", post(VideoController::upload_video))
        .route("/api/upload-video-file/", post(VideoController::upload_video_file))
        .route("/api/get-video-url/", post(VideoController::get_video_url))
        .route("/api/video/:recordId/", get(VideoController::video_detail))
        .route("/api/video/:recordId/subtitle/", get(VideoController::video_subtitle))
        .route("/api/video/:recordId/renew/", post(VideoController::renew_video))
        .route("/api/video/:recordId/delete/", post(VideoController::delete_video))
        .route("/api/videos/", get(VideoController::video_list))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(video_controller);

    // Build application routes
    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool.clone())
        .merge(audio_routes)
        .merge(video_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
