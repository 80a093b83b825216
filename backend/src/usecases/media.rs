use std::sync::Arc;

use eventhub::domain::{
    repositories::media_assets::MediaAssetRepository,
    value_objects::{
        enums::media_kinds::MediaKind,
        media_assets::{CreateMediaAssetModel, MediaAssetDto},
    },
};
use tracing::{error, info};
use validator::Validate;

use super::{
    content::{ContentError, ContentResult},
    uploads::{MediaStore, TempUpload},
};

const DOCUMENT_TYPES: [&str; 5] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
];

pub fn accepts(kind: MediaKind, content_type: &str) -> bool {
    match kind {
        MediaKind::Gallery => content_type.starts_with("image/"),
        MediaKind::InvestorDocument => {
            DOCUMENT_TYPES.contains(&content_type) || content_type.starts_with("image/")
        }
    }
}

/// Gallery images and investor documents.
pub struct MediaUseCase {
    repo: Arc<dyn MediaAssetRepository + Send + Sync>,
    media: Arc<MediaStore>,
}

impl MediaUseCase {
    pub fn new(repo: Arc<dyn MediaAssetRepository + Send + Sync>, media: Arc<MediaStore>) -> Self {
        Self { repo, media }
    }

    pub async fn list(&self, kind: MediaKind) -> ContentResult<Vec<MediaAssetDto>> {
        let assets = self.repo.list(kind).await.map_err(|err| {
            error!(%kind, db_error = ?err, "media: failed to list");
            ContentError::Internal(err)
        })?;

        Ok(assets.into_iter().map(MediaAssetDto::from).collect())
    }

    pub async fn upload(
        &self,
        kind: MediaKind,
        model: CreateMediaAssetModel,
        file: TempUpload,
    ) -> ContentResult<MediaAssetDto> {
        model.validate()?;
        if file.size_bytes() == 0 {
            return Err(ContentError::Validation("file is empty".to_string()));
        }
        if !accepts(kind, file.content_type()) {
            return Err(ContentError::Validation(format!(
                "{} is not accepted for {}",
                file.content_type(),
                kind
            )));
        }

        let stored = self.media.store(kind.key_prefix(), &file).await?;

        match self.repo.insert(model.to_entity(kind, &stored)).await {
            Ok(asset) => {
                info!(%kind, asset_id = asset.id, "media: uploaded");
                Ok(MediaAssetDto::from(asset))
            }
            Err(err) => {
                error!(%kind, db_error = ?err, "media: failed to insert");
                self.media.discard(&stored.key).await;
                Err(ContentError::Internal(err))
            }
        }
    }

    pub async fn delete(&self, kind: MediaKind, asset_id: i64) -> ContentResult<()> {
        let deleted = self
            .repo
            .delete(kind, asset_id)
            .await?
            .ok_or(ContentError::NotFound("media asset"))?;

        self.media.discard(&deleted.object_key).await;

        info!(%kind, asset_id, "media: deleted");
        Ok(())
    }
}
