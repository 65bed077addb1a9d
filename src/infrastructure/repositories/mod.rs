pub mod media_repository;
pub mod polly_tts_repository;
pub mod process_tts_repository;
pub mod s3_storage_repository;
pub mod storage_repository;
pub mod tts_repository;

pub use media_repository::{MediaRepository, PgMediaRepository};
pub use polly_tts_repository::PollyTtsRepository;
pub use process_tts_repository::ProcessTtsRepository;
pub use s3_storage_repository::S3StorageRepository;
pub use storage_repository::{StorageError, StorageRepository, StorageResult};
pub use tts_repository::{TtsAudio, TtsRepository};
