use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{
    application::posts::PostContent,
    domain::{entities::BlogPost, posts::MAX_FIELD_LENGTH},
    presentation::views::FormFieldView,
};

use super::validators;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Url,
    RichText,
}

impl FieldKind {
    fn input_type(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Url => "url",
            FieldKind::RichText => "textarea",
        }
    }
}

pub(crate) struct FieldSpec {
    pub(crate) name: &'static str,
    pub(crate) label: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) max_length: Option<usize>,
    value: fn(&PostForm) -> &str,
}

impl FieldSpec {
    fn check(&self, form: &PostForm) -> Vec<String> {
        let value = (self.value)(form);
        let mut errors = Vec::new();

        if let Err(message) = validators::required(value) {
            errors.push(message);
            return errors;
        }
        if let Some(max) = self.max_length {
            if let Err(message) = validators::max_length(value.trim(), max) {
                errors.push(message);
            }
        }
        if self.kind == FieldKind::Url {
            if let Err(message) = validators::url(value) {
                errors.push(message);
            }
        }
        errors
    }
}

/// Fields of the post editor in display order.
pub(crate) const POST_FORM_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        name: "title",
        label: "Blog Post Title",
        kind: FieldKind::Text,
        max_length: Some(MAX_FIELD_LENGTH),
        value: |form| &form.title,
    },
    FieldSpec {
        name: "subtitle",
        label: "Subtitle",
        kind: FieldKind::Text,
        max_length: Some(MAX_FIELD_LENGTH),
        value: |form| &form.subtitle,
    },
    FieldSpec {
        name: "author",
        label: "Your Name",
        kind: FieldKind::Text,
        max_length: Some(MAX_FIELD_LENGTH),
        value: |form| &form.author,
    },
    FieldSpec {
        name: "img_url",
        label: "Blog Image URL",
        kind: FieldKind::Url,
        max_length: Some(MAX_FIELD_LENGTH),
        value: |form| &form.img_url,
    },
    FieldSpec {
        name: "body",
        label: "Blog Content",
        kind: FieldKind::RichText,
        max_length: None,
        value: |form| &form.body,
    },
];

/// Raw editor submission. Missing fields deserialize as empty so that they
/// surface as validation errors instead of extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PostForm {
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) author: String,
    pub(crate) img_url: String,
    pub(crate) body: String,
    pub(crate) csrf_token: Option<String>,
}

impl PostForm {
    pub(crate) fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            img_url: post.img_url.clone(),
            body: post.body.clone(),
            csrf_token: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<ValidPost, PostFormErrors> {
        let mut errors = PostFormErrors::default();
        for field in &POST_FORM_FIELDS {
            for message in field.check(self) {
                errors.add_field(field.name, message);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidPost(PostContent {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            author: self.author.trim().to_string(),
            img_url: self.img_url.trim().to_string(),
            body: self.body.clone(),
        }))
    }

    /// Editor fields carrying the submitted values and any messages for them.
    pub(crate) fn field_views(&self, errors: &PostFormErrors) -> Vec<FormFieldView> {
        POST_FORM_FIELDS
            .iter()
            .map(|field| FormFieldView {
                name: field.name,
                label: field.label,
                input_type: field.kind.input_type(),
                is_rich_text: field.kind == FieldKind::RichText,
                value: (field.value)(self).to_string(),
                errors: errors.for_field(field.name).to_vec(),
            })
            .collect()
    }
}

/// A submission that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidPost(PostContent);

impl ValidPost {
    pub(crate) fn into_content(self) -> PostContent {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostFormErrors {
    form: Vec<String>,
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl PostFormErrors {
    pub(crate) fn add_form(&mut self, message: impl Into<String>) {
        self.form.push(message.into());
    }

    pub(crate) fn add_field(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub(crate) fn merge(&mut self, other: PostFormErrors) {
        self.form.extend(other.form);
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.form.is_empty() && self.fields.is_empty()
    }

    pub(crate) fn form_messages(&self) -> &[String] {
        &self.form
    }

    pub(crate) fn for_field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// All messages on one line, used for the attached error report.
    pub(crate) fn summary(&self) -> String {
        self.form
            .iter()
            .cloned()
            .chain(self.fields.iter().flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |message| format!("{field}: {message}"))
            }))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
