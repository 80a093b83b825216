use std::{collections::HashMap, fmt::Display, str::FromStr};

use axum::extract::Multipart;
use eventhub::infra::storages::minio::content_type_for;
use tracing::{debug, error};

use crate::usecases::uploads::{TempUpload, TempUploadWriter};

use super::error_responses::AppError;

/// A multipart form with its text fields in memory and at most one file spooled to disk.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    file: Option<TempUpload>,
}

impl MultipartForm {
    /// Reads every part. The part named `file_field` is streamed to a temp file; a
    /// second file part under that name is rejected.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name != file_field {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::BadRequest(err.body_text()))?;
                form.fields.insert(name, value);
                continue;
            }

            if form.file.is_some() {
                return Err(AppError::BadRequest(format!(
                    "only one `{}` part is accepted",
                    file_field
                )));
            }

            let file_name = field.file_name().map(str::to_string);
            let content_type = content_type_for(file_name.as_deref(), field.content_type());
            let mut writer = TempUploadWriter::create(file_name, content_type).await?;

            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?
            {
                writer.write(&chunk).await.map_err(|err| {
                    error!(error = ?err, "multipart: failed to spool upload");
                    AppError::Internal(err)
                })?;
            }

            debug!(size_bytes = writer.size_bytes(), "multipart: file received");
            form.file = Some(writer.finish().await?);
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<String, AppError> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))
    }

    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|err| AppError::BadRequest(format!("invalid {}: {}", name, err)))
            })
            .transpose()
    }

    /// Checkbox-style flag: `true`, `1` and `on` are set, anything else is not.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.text(name)
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "on"))
    }

    pub fn take_file(&mut self) -> Option<TempUpload> {
        self.file.take()
    }
}
