use axum::extract::Multipart;
use bytes::Bytes;

use super::error::AppError;
use crate::models::pet::PetDraft;

pub struct UploadedPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct PetFormData {
    pub draft: PetDraft,
    pub photo: Option<UploadedPhoto>,
}

/// Collects the flat pet fields and the optional photo out of a
/// `multipart/form-data` body. Browsers submit an empty file part when
/// no photo is chosen; that counts as no photo.
pub async fn read_pet_form(multipart: &mut Multipart) -> Result<PetFormData, AppError> {
    let mut draft = PetDraft::default();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => draft.name = field.text().await?,
            "category_id" => draft.category_id = field.text().await?,
            "category_name" => draft.category_name = field.text().await?,
            "status" => draft.status = field.text().await?,
            "tags" => draft.tags = field.text().await?,
            "photo" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    photo = Some(UploadedPhoto {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(PetFormData { draft, photo })
}
