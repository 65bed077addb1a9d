use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::media::{
    DeleteResponse, GetAudioUrlRequest, ListQuery, MediaKind, MediaRecordDto, MediaService,
    MediaServiceApi, MediaUrlResponse, RecordDetailResponse, RecordListResponse, RenewRequest,
    RenewResponse, UploadAudioRequest, UploadResponse,
};
use crate::error::AppResult;

pub struct AudioController {
    media_service: Arc<MediaService>,
}

impl AudioController {
    pub fn new(media_service: Arc<MediaService>) -> Self {
        Self { media_service }
    }

    /// POST /api/get-audio-url/ - Find-or-create an audio record and sign it
    pub async fn get_audio_url(
        State(controller): State<Arc<AudioController>>,
        Json(request): Json<GetAudioUrlRequest>,
    ) -> AppResult<Json<MediaUrlResponse>> {
        let outcome = controller
            .media_service
            .get_or_create_audio(request.text, request.tts_type, request.expire_time)
            .await?;

        Ok(Json(MediaUrlResponse {
            success: true,
            url: outcome.url,
            expire_time: outcome.expires_at,
            is_new: outcome.is_new,
            is_renewed: outcome.is_renewed,
            record_id: outcome.record.id,
            remaining_time: outcome.record.remaining_time(),
        }))
    }

    /// POST /api/upload-audio/ - Upload a pre-existing local audio file
    pub async fn upload_audio(
        State(controller): State<Arc<AudioController>>,
        Json(request): Json<UploadAudioRequest>,
    ) -> AppResult<Json<UploadResponse>> {
        let outcome = controller
            .media_service
            .upload_audio_from_path(
                request.file_path,
                request.text,
                request.tts_type,
                request.expire_time,
            )
            .await?;

        Ok(Json(UploadResponse {
            success: true,
            url: outcome.url,
            expire_time: outcome.expires_at,
            record_id: outcome.record.id,
            object_key: outcome.object_key,
        }))
    }

    /// GET /api/record/{recordId}/ - Record detail
    pub async fn record_detail(
        State(controller): State<Arc<AudioController>>,
        Path(record_id): Path<Uuid>,
    ) -> AppResult<Json<RecordDetailResponse>> {
        let view = controller
            .media_service
            .record_detail(MediaKind::Audio, record_id)
            .await?;

        Ok(Json(RecordDetailResponse {
            success: true,
            auto_renewed: view.auto_renewed,
            data: MediaRecordDto::from(&view.record),
        }))
    }

    /// GET /api/records/ - Record listing with optional text search
    pub async fn record_list(
        State(controller): State<Arc<AudioController>>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<RecordListResponse>> {
        let records = controller
            .media_service
            .list_records(MediaKind::Audio, query.limit, query.q)
            .await?;

        let data: Vec<MediaRecordDto> = records.iter().map(MediaRecordDto::from).collect();

        Ok(Json(RecordListResponse {
            success: true,
            count: data.len(),
            data,
        }))
    }

    /// POST /api/record/{recordId}/renew/ - Force a new signed URL
    pub async fn renew_record(
        State(controller): State<Arc<AudioController>>,
        Path(record_id): Path<Uuid>,
        Json(request): Json<RenewRequest>,
    ) -> AppResult<Json<RenewResponse>> {
        let fresh = controller
            .media_service
            .renew_record(MediaKind::Audio, record_id, request.expire_time)
            .await?;

        Ok(Json(RenewResponse {
            success: true,
            url: fresh.url,
            expire_time: fresh.expires_at,
            record_id,
        }))
    }

    /// POST /api/record/{recordId}/delete/ - Delete object and row
    pub async fn delete_record(
        State(controller): State<Arc<AudioController>>,
        Path(record_id): Path<Uuid>,
    ) -> AppResult<Json<DeleteResponse>> {
        controller
            .media_service
            .delete_record(MediaKind::Audio, record_id)
            .await?;

        Ok(Json(DeleteResponse { success: true }))
    }
}
