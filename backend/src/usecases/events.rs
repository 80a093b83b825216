use std::sync::Arc;

use eventhub::domain::{
    repositories::events::EventRepository,
    value_objects::{
        events::{CreateEventModel, EventDeletion, EventDto, UpdateEventModel},
        storage::StoredObject,
    },
};
use tracing::{error, info, warn};
use validator::Validate;

use super::{
    content::{ContentError, ContentResult},
    uploads::{MediaStore, TempUpload},
};

const IMAGE_PREFIX: &str = "events";

pub struct EventUseCase {
    repo: Arc<dyn EventRepository + Send + Sync>,
    media: Arc<MediaStore>,
}

impl EventUseCase {
    pub fn new(repo: Arc<dyn EventRepository + Send + Sync>, media: Arc<MediaStore>) -> Self {
        Self { repo, media }
    }

    pub async fn list(&self) -> ContentResult<Vec<EventDto>> {
        let events = self.repo.list().await.map_err(|err| {
            error!(db_error = ?err, "events: failed to list");
            ContentError::Internal(err)
        })?;

        Ok(events.into_iter().map(EventDto::from).collect())
    }

    pub async fn get(&self, event_id: i64) -> ContentResult<EventDto> {
        self.repo
            .find_by_id(event_id)
            .await?
            .map(EventDto::from)
            .ok_or(ContentError::NotFound("event"))
    }

    pub async fn create(
        &self,
        model: CreateEventModel,
        image: Option<TempUpload>,
    ) -> ContentResult<EventDto> {
        model.validate()?;
        let stored = self.store_image(image.as_ref()).await?;

        match self.repo.insert(model.to_entity(stored.as_ref())).await {
            Ok(event) => {
                info!(event_id = event.id, "events: created");
                Ok(EventDto::from(event))
            }
            Err(err) => {
                error!(db_error = ?err, "events: failed to insert");
                self.discard(stored.as_ref()).await;
                Err(ContentError::Internal(err))
            }
        }
    }

    pub async fn update(
        &self,
        event_id: i64,
        model: UpdateEventModel,
        image: Option<TempUpload>,
    ) -> ContentResult<EventDto> {
        model.validate()?;
        let previous = self
            .repo
            .find_by_id(event_id)
            .await?
            .ok_or(ContentError::NotFound("event"))?;

        let stored = self.store_image(image.as_ref()).await?;

        let updated = match self.repo.update(event_id, model.to_entity(stored.as_ref())).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                self.discard(stored.as_ref()).await;
                return Err(ContentError::NotFound("event"));
            }
            Err(err) => {
                error!(event_id, db_error = ?err, "events: failed to update");
                self.discard(stored.as_ref()).await;
                return Err(ContentError::Internal(err));
            }
        };

        if stored.is_some() {
            if let Some(old_key) = previous.image_key.as_deref() {
                self.media.discard(old_key).await;
            }
        }

        info!(event_id, "events: updated");
        Ok(EventDto::from(updated))
    }

    pub async fn delete(&self, event_id: i64) -> ContentResult<()> {
        let deleted = match self.repo.delete(event_id).await? {
            EventDeletion::Deleted(event) => event,
            EventDeletion::NotFound => return Err(ContentError::NotFound("event")),
            EventDeletion::Referenced => {
                warn!(event_id, "events: delete refused, orders reference the event");
                return Err(ContentError::Conflict(
                    "event has orders and cannot be deleted",
                ));
            }
        };

        if let Some(key) = deleted.image_key.as_deref() {
            self.media.discard(key).await;
        }

        info!(event_id, "events: deleted");
        Ok(())
    }

    async fn store_image(&self, image: Option<&TempUpload>) -> ContentResult<Option<StoredObject>> {
        let Some(upload) = image else {
            return Ok(None);
        };
        if !upload.is_image() {
            return Err(ContentError::Validation(
                "event image must be an image".to_string(),
            ));
        }

        Ok(Some(self.media.store(IMAGE_PREFIX, upload).await?))
    }

    async fn discard(&self, stored: Option<&StoredObject>) {
        if let Some(object) = stored {
            self.media.discard(&object.key).await;
        }
    }
}
