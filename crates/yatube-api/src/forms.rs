//! HTML-form handling for the post, comment and account pages.
//!
//! Post forms arrive either urlencoded or as `multipart/form-data` (when an
//! image is attached). Both shapes are read into a [`PostSubmission`] and
//! cleaned against the known groups before anything touches the store.

use axum::{
    extract::{Form, FromRequest, Multipart, Request, multipart::MultipartError},
    http::header,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use yatube_common::{
    error::YatubeError,
    models::{Group, post::PostForm},
    validation::FormErrors,
};

pub const INVALID_GROUP_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE_MESSAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

// ── Form description ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: i64,
    pub label: String,
}

/// One input of a form as the template draws it.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub required: bool,
    pub widget: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, widget: &'static str) -> Self {
        Self {
            name,
            label,
            help_text: "",
            required: false,
            widget,
            choices: None,
        }
    }

    fn help(mut self, text: &'static str) -> Self {
        self.help_text = text;
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The `form` entry of a page context: fields, bound values and errors.
#[derive(Debug, Clone, Serialize)]
pub struct FormContext {
    pub fields: Vec<FieldSpec>,
    pub values: Value,
    pub errors: FormErrors,
}

impl FormContext {
    fn build(fields: Vec<FieldSpec>, values: impl Serialize, errors: FormErrors) -> Self {
        Self {
            fields,
            values: serde_json::to_value(values).unwrap_or_default(),
            errors,
        }
    }

    pub fn post_form(groups: &[Group], values: &PostForm, errors: FormErrors) -> Self {
        let mut group = FieldSpec::new("group", "Группа", "select").help("Выберите группу");
        group.choices = Some(
            groups
                .iter()
                .map(|g| Choice {
                    value: g.id,
                    label: g.title.clone(),
                })
                .collect(),
        );

        Self::build(
            vec![
                FieldSpec::new("text", "Текст поста", "textarea")
                    .help("Введите сообщение")
                    .required(),
                group,
                FieldSpec::new("image", "Картинка", "file"),
            ],
            values,
            errors,
        )
    }

    pub fn comment_form() -> Self {
        Self::build(
            vec![
                FieldSpec::new("text", "Добавить комментарий", "textarea")
                    .help("Текст комментария")
                    .required(),
            ],
            serde_json::json!({ "text": "" }),
            FormErrors::new(),
        )
    }

    pub fn signup_form(values: impl Serialize, errors: FormErrors) -> Self {
        Self::build(
            vec![
                FieldSpec::new("first_name", "Имя", "text"),
                FieldSpec::new("last_name", "Фамилия", "text"),
                FieldSpec::new("username", "Имя пользователя", "text").required(),
                FieldSpec::new("password", "Пароль", "password").required(),
            ],
            values,
            errors,
        )
    }

    pub fn login_form(values: impl Serialize, errors: FormErrors) -> Self {
        Self::build(
            vec![
                FieldSpec::new("username", "Имя пользователя", "text").required(),
                FieldSpec::new("password", "Пароль", "password").required(),
            ],
            values,
            errors,
        )
    }
}

// ── Post submissions ─────────────────────────────────────────────────────────

/// An uploaded image file, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Declared content type first, file extension as the fallback.
    pub fn looks_like_image(&self) -> bool {
        let declared = self
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream");
        match declared {
            Some(ct) => ct.starts_with("image/"),
            None => mime_guess::from_path(&self.file_name)
                .first()
                .is_some_and(|m| m.type_() == mime_guess::mime::IMAGE),
        }
    }
}

/// Raw post form fields as submitted.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub text: String,
    /// Group id as typed; empty means "no group".
    pub group: String,
    pub image: Option<ImageUpload>,
}

/// A post form that passed cleaning.
#[derive(Debug, Clone)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<ImageUpload>,
}

impl PostSubmission {
    /// Values to redisplay when the form comes back with errors.
    pub fn bound_values(&self) -> PostForm {
        PostForm {
            text: self.text.clone(),
            group: self.group.trim().parse().ok(),
        }
    }

    /// Check every field, collecting all problems at once.
    pub fn clean(self, groups: &[Group]) -> Result<CleanedPost, (PostForm, FormErrors)> {
        let values = self.bound_values();
        let mut errors = values.clean().err().unwrap_or_default();

        let raw_group = self.group.trim();
        let group_id = if raw_group.is_empty() {
            None
        } else {
            match raw_group.parse::<i64>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors.add("group", INVALID_GROUP_MESSAGE);
                    None
                }
            }
        };

        if let Some(image) = &self.image {
            if !image.looks_like_image() {
                errors.add("image", INVALID_IMAGE_MESSAGE);
            }
        }

        if !errors.is_empty() {
            return Err((values, errors));
        }

        Ok(CleanedPost {
            text: self.text,
            group_id,
            image: self.image,
        })
    }
}

fn malformed(e: MultipartError) -> YatubeError {
    YatubeError::Validation {
        message: e.body_text(),
    }
}

impl<S> FromRequest<S> for PostSubmission
where
    S: Send + Sync,
{
    type Rejection = YatubeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(mut fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| YatubeError::Validation {
                    message: e.body_text(),
                })?;
            return Ok(Self {
                text: fields.remove("text").unwrap_or_default(),
                group: fields.remove("group").unwrap_or_default(),
                image: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| YatubeError::Validation {
                message: e.body_text(),
            })?;

        let mut submission = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => submission.text = field.text().await.map_err(malformed)?,
                "group" => submission.group = field.text().await.map_err(malformed)?,
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(malformed)?;
                    // An empty file input still sends a part.
                    if !data.is_empty() {
                        submission.image = Some(ImageUpload {
                            file_name,
                            content_type,
                            data: data.to_vec(),
                        });
                    }
                }
                other => tracing::debug!(field = other, "Ignoring unknown post form field"),
            }
        }

        Ok(submission)
    }
}
