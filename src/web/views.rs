use axum::response::Html;
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use super::error::AppError;
use super::flash::{Flash, FlashKind};
use crate::models::pet::{CATEGORIES, STATUSES, escape_html};

// Template names deliberately avoid the `.html` suffix so Tera's
// autoescaping stays out of the way: all escaping is done explicitly
// when `PetView`s are built, never inside the templates.
static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("layout", include_str!("../../templates/layout.tera")),
        ("pets/index", include_str!("../../templates/index.tera")),
        ("pets/show", include_str!("../../templates/show.tera")),
        ("pets/create", include_str!("../../templates/create.tera")),
        ("pets/edit", include_str!("../../templates/edit.tera")),
    ])
    .expect("built-in templates are valid");
    tera
});

#[derive(Serialize)]
struct CategoryOption {
    id: i64,
    name: &'static str,
}

pub fn render(name: &str, context: &Context) -> Result<Html<String>, AppError> {
    Ok(Html(TEMPLATES.render(name, context)?))
}

pub fn base_context(flash: Option<&Flash>) -> Context {
    let mut context = Context::new();
    if let Some(flash) = flash {
        // The flash cookie is client-settable, so its message crosses
        // the render boundary like any other untrusted text.
        let message = escape_html(&flash.message);
        match flash.kind {
            FlashKind::Success => context.insert("flash_success", &message),
            FlashKind::Error => context.insert("flash_error", &message),
        }
    }
    context
}

/// Context for the create/edit forms: the fixed category and status
/// choices plus any field-level validation errors.
pub fn form_context(flash: Option<&Flash>, errors: &[crate::models::pet::FieldError]) -> Context {
    let mut context = base_context(flash);
    let categories: Vec<CategoryOption> = CATEGORIES
        .iter()
        .map(|(id, name)| CategoryOption { id: *id, name })
        .collect();
    context.insert("categories", &categories);
    context.insert("statuses", &STATUSES);
    context.insert("errors", errors);
    context
}
