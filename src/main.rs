use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediavault_backend::controllers::audio::AudioController;
use mediavault_backend::controllers::video::VideoController;
use mediavault_backend::domain::media::MediaService;
use mediavault_backend::infrastructure::config::{Config, LogFormat};
use mediavault_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use mediavault_backend::infrastructure::http::start_http_server;
use mediavault_backend::infrastructure::repositories::{
    PgMediaRepository, PollyTtsRepository, ProcessTtsRepository, S3StorageRepository,
};
use mediavault_backend::infrastructure::thumbnail::ThumbnailGenerator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting MediaVault Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    // AWS clients (Polly for cloud TTS, S3 for object storage)
    tracing::info!("Loading AWS configuration for region: {}", config.aws_region);
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));

    let s3_client = match &config.storage_endpoint_url {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Using custom object-storage endpoint");
            let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
                .endpoint_url(endpoint)
                .force_path_style(true)
                .build();
            Arc::new(aws_sdk_s3::Client::from_conf(s3_config))
        }
        None => Arc::new(aws_sdk_s3::Client::new(&aws_config)),
    };
    tracing::info!(bucket = %config.storage_bucket, "Object-storage client initialized");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool and vendor clients)
    tracing::info!("Instantiating repositories...");
    let media_repo = Arc::new(PgMediaRepository::new(pool.clone()));
    let storage_repo = Arc::new(S3StorageRepository::new(
        s3_client,
        config.storage_bucket.clone(),
    ));
    let cloud_tts = Arc::new(PollyTtsRepository::new(
        polly_client,
        config.polly_voice.clone(),
    ));
    let local_tts = Arc::new(ProcessTtsRepository::new(
        config.local_tts_command.clone(),
        config.local_tts_model.clone(),
    ));

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let media_service = Arc::new(MediaService::new(
        media_repo,
        storage_repo,
        local_tts,
        cloud_tts,
        Arc::new(ThumbnailGenerator::new()),
        config.default_url_ttl_secs,
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let audio_controller = Arc::new(AudioController::new(media_service.clone()));
    let video_controller = Arc::new(VideoController::new(media_service));

    // Start HTTP server with all routes
    start_http_server(pool, config, audio_controller, video_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "mediavault_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "mediavault_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
