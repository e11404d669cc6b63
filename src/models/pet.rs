use serde::{Deserialize, Serialize};

/// The three categories offered by the UI. The upstream petstore API has
/// no endpoint for listing categories, so the set is fixed client-side.
pub const CATEGORIES: [(i64, &str); 3] = [(1, "Dogs"), (2, "Cats"), (3, "Birds")];

pub const STATUSES: [&str; 3] = ["available", "pending", "sold"];

// --- Wire shape (as exchanged with the petstore API) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(rename = "photoUrls", default)]
    pub photo_urls: Vec<String>,
}

// --- Flat form input ---

/// The flat fields posted by the create/edit forms, before they are
/// mapped into the nested wire shape.
#[derive(Debug, Clone, Default)]
pub struct PetDraft {
    pub id: Option<i64>,
    pub name: String,
    pub category_id: String,
    pub category_name: String,
    pub status: String,
    pub tags: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl PetDraft {
    /// Presence/type/enum checks only; anything deeper is owned by the
    /// upstream API.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "The name field is required."));
        }

        match self.category_id.trim().parse::<i64>() {
            Ok(id) if CATEGORIES.iter().any(|(cid, _)| *cid == id) => {}
            Ok(_) => errors.push(FieldError::new("category_id", "Unknown category.")),
            Err(_) => errors.push(FieldError::new(
                "category_id",
                "The category must be a number.",
            )),
        }

        if self.category_name.trim().is_empty() {
            errors.push(FieldError::new(
                "category_name",
                "The category name field is required.",
            ));
        }

        if !STATUSES.contains(&self.status.as_str()) {
            errors.push(FieldError::new(
                "status",
                "The status must be one of: available, pending, sold.",
            ));
        }

        errors
    }

    /// Builds the nested wire shape. Raw text goes to the API unescaped;
    /// escaping happens only at the render boundary.
    pub fn into_pet(self, photo_urls: Vec<String>) -> Pet {
        let category_id = self.category_id.trim().parse::<i64>().unwrap_or_default();
        Pet {
            id: self.id,
            name: self.name,
            category: Category {
                id: category_id,
                name: self.category_name,
            },
            status: self.status,
            tags: split_tags(&self.tags),
            photo_urls,
        }
    }
}

/// Splits a comma-separated tag string into tag objects, trimming each
/// piece and dropping empties, so `""` yields no tags at all.
pub fn split_tags(input: &str) -> Vec<Tag> {
    input
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| Tag {
            name: piece.to_string(),
        })
        .collect()
}

/// Minimal HTML escaping for text re-displayed in views.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// --- Display shape ---

/// A pet prepared for rendering: every text field HTML-escaped, tags
/// joined back into the comma-separated form the templates expect.
#[derive(Debug, Clone, Serialize)]
pub struct PetView {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: String,
    pub status: String,
    pub tags: String,
    pub photo_url: Option<String>,
}

impl PetView {
    pub fn from_pet(pet: &Pet) -> Self {
        let tags = pet
            .tags
            .iter()
            .map(|tag| escape_html(&tag.name))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: pet.id.unwrap_or_default(),
            name: escape_html(&pet.name),
            category_id: pet.category.id,
            category_name: escape_html(&pet.category.name),
            status: escape_html(&pet.status),
            tags,
            photo_url: pet.photo_urls.first().map(|url| escape_html(url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PetDraft {
        PetDraft {
            id: None,
            name: "Rex".to_string(),
            category_id: "1".to_string(),
            category_name: "Dogs".to_string(),
            status: "available".to_string(),
            tags: "friendly, loud".to_string(),
        }
    }

    #[test]
    fn splits_and_trims_tags() {
        assert_eq!(
            split_tags("tag1, tag2"),
            vec![
                Tag {
                    name: "tag1".to_string()
                },
                Tag {
                    name: "tag2".to_string()
                },
            ]
        );
    }

    #[test]
    fn empty_tag_input_yields_no_tags() {
        assert!(split_tags("").is_empty());
        assert!(split_tags("  ,  , ").is_empty());
    }

    #[test]
    fn valid_draft_passes_validation() {
        assert!(valid_draft().validate().is_empty());
    }

    #[test]
    fn rejects_unknown_status() {
        let mut draft = valid_draft();
        draft.status = "lost".to_string();
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "status");
    }

    #[test]
    fn rejects_category_outside_fixed_set() {
        let mut draft = valid_draft();
        draft.category_id = "7".to_string();
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "category_id");
    }

    #[test]
    fn rejects_non_numeric_category() {
        let mut draft = valid_draft();
        draft.category_id = "dogs".to_string();
        assert_eq!(draft.validate()[0].field, "category_id");
    }

    #[test]
    fn rejects_blank_name() {
        let mut draft = valid_draft();
        draft.name = "   ".to_string();
        assert_eq!(draft.validate()[0].field, "name");
    }

    #[test]
    fn draft_maps_to_nested_wire_shape() {
        let pet = valid_draft().into_pet(vec!["/storage/photos/a.jpg".to_string()]);
        assert_eq!(pet.id, None);
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.category.id, 1);
        assert_eq!(pet.category.name, "Dogs");
        assert_eq!(pet.status, "available");
        assert_eq!(pet.tags.len(), 2);
        assert_eq!(pet.tags[0].name, "friendly");
        assert_eq!(pet.photo_urls, vec!["/storage/photos/a.jpg".to_string()]);
    }

    #[test]
    fn wire_shape_uses_camel_case_photo_urls() {
        let pet = valid_draft().into_pet(vec!["/storage/photos/a.jpg".to_string()]);
        let json = serde_json::to_value(&pet).unwrap();
        assert!(json.get("photoUrls").is_some());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<b a="1">&'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn view_escapes_every_text_field() {
        let mut draft = valid_draft();
        draft.name = "<script>alert(1)</script>".to_string();
        let pet = draft.into_pet(Vec::new());
        let view = PetView::from_pet(&pet);
        assert_eq!(view.name, "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert_eq!(view.photo_url, None);
    }
}
