use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::media::{
    DeleteResponse, GetVideoUrlRequest, ListQuery, MediaKind, MediaRecordDto, MediaService,
    MediaServiceApi, MediaUrlResponse, RecordDetailResponse, RecordListResponse, RenewRequest,
    RenewResponse, UploadResponse, UploadVideoRequest, VideoUploadResponse,
};
use crate::error::{AppError, AppResult};

pub struct VideoController {
    media_service: Arc<MediaService>,
}

impl VideoController {
    pub fn new(media_service: Arc<MediaService>) -> Self {
        Self { media_service }
    }

    /// POST /api/upload-video/ - Upload a pre-existing local video file
    pub async fn upload_video(
        State(controller): State<Arc<VideoController>>,
        Json(request): Json<UploadVideoRequest>,
    ) -> AppResult<Json<UploadResponse>> {
        let outcome = controller
            .media_service
            .upload_video_from_path(request.file_path, request.title, request.expire_time)
            .await?;

        Ok(Json(UploadResponse {
            success: true,
            url: outcome.url,
            expire_time: outcome.expires_at,
            record_id: outcome.record.id,
            object_key: outcome.object_key,
        }))
    }

    /// POST /api/upload-video-file/ - Multipart upload with optional
    /// subtitle; a thumbnail is extracted server-side
    pub async fn upload_video_file(
        State(controller): State<Arc<VideoController>>,
        mut multipart: Multipart,
    ) -> AppResult<Json<VideoUploadResponse>> {
        let mut video: Option<(String, Vec<u8>)> = None;
        let mut subtitle: Option<(String, Vec<u8>)> = None;
        let mut title: Option<String> = None;
        let mut expire_time: Option<i64> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?
        {
            let name = field.name().map(|n| n.to_string());
            match name.as_deref() {
                Some("video_file") => {
                    let filename = field
                        .file_name()
                        .unwrap_or("video.mp4")
                        .to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("failed to read video_file: {}", e)))?;
                    video = Some((filename, data.to_vec()));
                }
                Some("subtitle_file") => {
                    let filename = field
                        .file_name()
                        .unwrap_or("subtitle.srt")
                        .to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("failed to read subtitle_file: {}", e)))?;
                    subtitle = Some((filename, data.to_vec()));
                }
                Some("title") => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("invalid title field: {}", e)))?;
                    title = Some(value);
                }
                Some("expire_time") => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("invalid expire_time field: {}", e)))?;
                    let parsed = value.trim().parse::<i64>().map_err(|_| {
                        AppError::BadRequest("expire_time must be an integer number of seconds".to_string())
                    })?;
                    expire_time = Some(parsed);
                }
                _ => {}
            }
        }

        let (filename, data) =
            video.ok_or_else(|| AppError::BadRequest("video_file is required".to_string()))?;

        let outcome = controller
            .media_service
            .upload_video_file(filename, data, title, subtitle, expire_time)
            .await?;

        Ok(Json(VideoUploadResponse {
            success: true,
            record_id: outcome.record.id,
            title: outcome.record.subject.clone(),
            url: outcome.url,
            expire_time: outcome.expires_at,
            object_key: outcome.object_key,
            file_size: outcome.record.file_size,
            thumbnail_url: outcome.record.thumbnail_url.clone(),
            subtitle_url: outcome.record.subtitle_url.clone(),
        }))
    }

    /// POST /api/get-video-url/ - Signed URL for an existing video by title
    pub async fn get_video_url(
        State(controller): State<Arc<VideoController>>,
        Json(request): Json<GetVideoUrlRequest>,
    ) -> AppResult<Json<MediaUrlResponse>> {
        let outcome = controller
            .media_service
            .get_video_url(request.title, request.expire_time)
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

    /// GET /api/video/{recordId}/ - Video record detail
    pub async fn video_detail(
        State(controller): State<Arc<VideoController>>,
        Path(record_id): Path<Uuid>,
    ) -> AppResult<Json<RecordDetailResponse>> {
        let view = controller
            .media_service
            .record_detail(MediaKind::Video, record_id)
            .await?;

        Ok(Json(RecordDetailResponse {
            success: true,
            auto_renewed: view.auto_renewed,
            data: MediaRecordDto::from(&view.record),
        }))
    }

    /// GET /api/videos/ - Video listing with optional title search
    pub async fn video_list(
        State(controller): State<Arc<VideoController>>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<RecordListResponse>> {
        let records = controller
            .media_service
            .list_records(MediaKind::Video, query.limit, query.q)
            .await?;

        let data: Vec<MediaRecordDto> = records.iter().map(MediaRecordDto::from).collect();

        Ok(Json(RecordListResponse {
            success: true,
            count: data.len(),
            data,
        }))
    }

    /// GET /api/video/{recordId}/subtitle/ - Subtitle proxy, always WebVTT
    pub async fn video_subtitle(
        State(controller): State<Arc<VideoController>>,
        Path(record_id): Path<Uuid>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let vtt = controller.media_service.video_subtitle(record_id).await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/vtt; charset=utf-8".parse().unwrap());
        headers.insert(header::CACHE_CONTROL, "no-cache".parse().unwrap());

        Ok((StatusCode::OK, headers, Body::from(vtt)))
    }

    /// POST /api/video/{recordId}/renew/ - Force a new signed URL
    pub async fn renew_video(
        State(controller): State<Arc<VideoController>>,
        Path(record_id): Path<Uuid>,
        Json(request): Json<RenewRequest>,
    ) -> AppResult<Json<RenewResponse>> {
        let fresh = controller
            .media_service
            .renew_record(MediaKind::Video, record_id, request.expire_time)
            .await?;

        Ok(Json(RenewResponse {
            success: true,
            url: fresh.url,
            expire_time: fresh.expires_at,
            record_id,
        }))
    }

    /// POST /api/video/{recordId}/delete/ - Delete objects and row
    pub async fn delete_video(
        State(controller): State<Arc<VideoController>>,
        Path(record_id): Path<Uuid>,
    ) -> AppResult<Json<DeleteResponse>> {
        controller
            .media_service
            .delete_record(MediaKind::Video, record_id)
            .await?;

        Ok(Json(DeleteResponse { success: true }))
    }
}
