use std::sync::Arc;

use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::models::pet::{FieldError, PetView};
use crate::web::{
    AppState,
    error::AppError,
    flash::{self, FlashKind},
    forms::{PetFormData, read_pet_form},
    views,
};
use crate::services::photo_storage::PhotoStorage;

const GENERIC_CREATE_ERROR: &str = "An error occurred while adding the pet.";
const GENERIC_UPDATE_ERROR: &str = "An error occurred while updating the pet.";
const GENERIC_DELETE_ERROR: &str = "An error occurred while deleting the pet.";

/// Field checks plus the photo constraints, all run before any side
/// effect. API failures are a separate channel and never end up here.
fn validate_form(form: &PetFormData) -> Vec<FieldError> {
    let mut errors = form.draft.validate();
    if let Some(photo) = &form.photo {
        if let Err(e) = PhotoStorage::validate(&photo.content_type, photo.bytes.len()) {
            errors.push(FieldError {
                field: "photo",
                message: e.to_string(),
            });
        }
    }
    errors
}

// --- Route Handlers ---

async fn list_pets_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    let mut context = views::base_context(flash.as_ref());

    match app_state.pet_api.list_available().await {
        Ok(pets) => {
            let pets: Vec<PetView> = pets.iter().map(PetView::from_pet).collect();
            context.insert("pets", &pets);
        }
        Err(e) => {
            warn!(error = %e, "failed to fetch available pets");
            context.insert("pets", &Vec::<PetView>::new());
            context.insert("flash_error", "Could not load pets from the petstore API.");
        }
    }

    Ok((jar, views::render("pets/index", &context)?).into_response())
}

async fn show_create_form_handler(jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    let context = views::form_context(flash.as_ref(), &[]);
    Ok((jar, views::render("pets/create", &context)?).into_response())
}

async fn create_pet_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_pet_form(&mut multipart).await?;

    let errors = validate_form(&form);
    if !errors.is_empty() {
        // Consume any pending flash so it cannot pop up stale later.
        let (jar, _) = flash::take(jar);
        let context = views::form_context(None, &errors);
        return Ok((jar, views::render("pets/create", &context)?).into_response());
    }

    let mut photo_urls = Vec::new();
    if let Some(photo) = &form.photo {
        match app_state
            .photos
            .store(&photo.content_type, &photo.bytes)
            .await
        {
            Ok(url) => photo_urls.push(url),
            Err(e) => {
                warn!(error = %e, "failed to store uploaded photo");
                let jar = flash::set(jar, FlashKind::Error, GENERIC_CREATE_ERROR);
                return Ok((jar, Redirect::to("/pets/create")).into_response());
            }
        }
    }

    let pet = form.draft.into_pet(photo_urls);
    match app_state.pet_api.create(&pet).await {
        Ok(created) => {
            let id = created.id.unwrap_or_default();
            let jar = flash::set(jar, FlashKind::Success, "Pet added.");
            Ok((jar, Redirect::to(&format!("/pets/{id}"))).into_response())
        }
        Err(e) => {
            warn!(error = %e, "petstore rejected pet creation");
            let jar = flash::set(jar, FlashKind::Error, GENERIC_CREATE_ERROR);
            Ok((jar, Redirect::to("/pets/create")).into_response())
        }
    }
}

async fn show_pet_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    match app_state.pet_api.get(id).await {
        Ok(pet) => {
            let mut context = views::base_context(flash.as_ref());
            context.insert("pet", &PetView::from_pet(&pet));
            Ok((jar, views::render("pets/show", &context)?).into_response())
        }
        Err(e) => {
            warn!(pet_id = id, error = %e, "pet not found");
            // Carried-over UX: missing records land on the create form,
            // not a 404 page.
            let jar = flash::set(jar, FlashKind::Error, "Pet not found.");
            Ok((jar, Redirect::to("/pets/create")).into_response())
        }
    }
}

async fn show_edit_form_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    match app_state.pet_api.get(id).await {
        Ok(pet) => {
            let mut context = views::form_context(flash.as_ref(), &[]);
            context.insert("pet", &PetView::from_pet(&pet));
            Ok((jar, views::render("pets/edit", &context)?).into_response())
        }
        Err(e) => {
            warn!(pet_id = id, error = %e, "pet not found");
            let jar = flash::set(jar, FlashKind::Error, "Pet not found.");
            Ok((jar, Redirect::to("/pets/create")).into_response())
        }
    }
}

async fn update_pet_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_pet_form(&mut multipart).await?;

    let errors = validate_form(&form);
    if !errors.is_empty() {
        // Consume any pending flash so it cannot pop up stale later.
        let (jar, _) = flash::take(jar);
        return match app_state.pet_api.get(id).await {
            Ok(pet) => {
                let mut context = views::form_context(None, &errors);
                context.insert("pet", &PetView::from_pet(&pet));
                Ok((jar, views::render("pets/edit", &context)?).into_response())
            }
            Err(e) => {
                warn!(pet_id = id, error = %e, "pet not found");
                let jar = flash::set(jar, FlashKind::Error, "Pet not found.");
                Ok((jar, Redirect::to("/pets/create")).into_response())
            }
        };
    }

    // The old photo URL is only discoverable through the current record,
    // so the fetch has to happen before anything is replaced.
    let current = match app_state.pet_api.get(id).await {
        Ok(pet) => pet,
        Err(e) => {
            warn!(pet_id = id, error = %e, "could not fetch pet before update");
            let jar = flash::set(jar, FlashKind::Error, GENERIC_UPDATE_ERROR);
            return Ok((jar, Redirect::to(&format!("/pets/{id}/edit"))).into_response());
        }
    };

    let mut photo_urls = current.photo_urls.clone();
    if let Some(photo) = &form.photo {
        if let Some(old_url) = current.photo_urls.first() {
            if let Err(e) = app_state.photos.delete(old_url).await {
                warn!(pet_id = id, url = %old_url, error = %e, "failed to delete superseded photo");
            }
        }
        match app_state
            .photos
            .store(&photo.content_type, &photo.bytes)
            .await
        {
            Ok(url) => photo_urls = vec![url],
            Err(e) => {
                warn!(error = %e, "failed to store uploaded photo");
                let jar = flash::set(jar, FlashKind::Error, GENERIC_UPDATE_ERROR);
                return Ok((jar, Redirect::to(&format!("/pets/{id}/edit"))).into_response());
            }
        }
    }

    let mut draft = form.draft;
    draft.id = Some(id);
    let pet = draft.into_pet(photo_urls);
    match app_state.pet_api.update(&pet).await {
        Ok(updated) => {
            let id = updated.id.unwrap_or(id);
            let jar = flash::set(jar, FlashKind::Success, "Pet updated.");
            Ok((jar, Redirect::to(&format!("/pets/{id}"))).into_response())
        }
        Err(e) => {
            warn!(pet_id = id, error = %e, "petstore rejected pet update");
            let jar = flash::set(jar, FlashKind::Error, GENERIC_UPDATE_ERROR);
            Ok((jar, Redirect::to(&format!("/pets/{id}/edit"))).into_response())
        }
    }
}

async fn delete_pet_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match app_state.pet_api.get(id).await {
        Ok(current) => {
            if let Some(url) = current.photo_urls.first() {
                if let Err(e) = app_state.photos.delete(url).await {
                    warn!(pet_id = id, url = %url, error = %e, "failed to delete pet photo");
                }
            }
        }
        Err(e) => {
            warn!(pet_id = id, error = %e, "could not fetch pet before delete; skipping photo cleanup");
        }
    }

    match app_state.pet_api.delete(id).await {
        Ok(()) => {
            // Carried-over UX: deletion lands on the create form, not
            // the list.
            let jar = flash::set(jar, FlashKind::Success, "Pet deleted.");
            Ok((jar, Redirect::to("/pets/create")).into_response())
        }
        Err(e) => {
            warn!(pet_id = id, error = %e, "petstore rejected pet deletion");
            let jar = flash::set(jar, FlashKind::Error, GENERIC_DELETE_ERROR);
            Ok((jar, Redirect::to(&format!("/pets/{id}"))).into_response())
        }
    }
}

// --- Router ---

pub fn pet_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_pets_handler).post(create_pet_handler))
        .route("/create", get(show_create_form_handler))
        .route(
            "/{id}",
            get(show_pet_handler)
                .put(update_pet_handler)
                .delete(delete_pet_handler),
        )
        .route("/{id}/edit", get(show_edit_form_handler))
}
