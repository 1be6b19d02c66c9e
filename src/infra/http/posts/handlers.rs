use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    application::{
        error::ErrorReport,
        posts::{PostContent, PostServiceError},
    },
    presentation::views::{
        LayoutContext, PostEditorTemplate, PostEditorView, render_not_found_response,
        render_template_response,
    },
};

use super::forms::{PostForm, PostFormErrors};
use crate::infra::http::{HttpState, parse_post_id, post_service_error_response};

const DUPLICATE_TITLE_MESSAGE: &str = "A post with this title already exists.";

#[derive(Clone, Copy)]
enum EditorMode {
    Create,
    Edit(i64),
}

impl EditorMode {
    fn source(self) -> &'static str {
        match self {
            EditorMode::Create => "infra::http::posts::new_post",
            EditorMode::Edit(_) => "infra::http::posts::edit_post",
        }
    }

    fn view(self, form: &PostForm, errors: &PostFormErrors, csrf_token: String) -> PostEditorView {
        let (heading, subheading, action, submit_label) = match self {
            EditorMode::Create => (
                "New Post",
                "You're going to make a great blog post!",
                "/new-post".to_string(),
                "Submit Post",
            ),
            EditorMode::Edit(id) => (
                "Edit Post",
                "Make it even better.",
                format!("/edit/{id}"),
                "Save Changes",
            ),
        };

        let fields = form.field_views(errors);
        PostEditorView {
            heading: heading.to_string(),
            subheading: subheading.to_string(),
            action,
            submit_label: submit_label.to_string(),
            csrf_token,
            form_errors: errors.form_messages().to_vec(),
            has_rich_text: fields.iter().any(|field| field.is_rich_text),
            fields,
        }
    }
}

pub(crate) async fn new_post_form(State(state): State<HttpState>) -> Response {
    render_editor(
        &state,
        EditorMode::Create,
        &PostForm::default(),
        &PostFormErrors::default(),
        StatusCode::OK,
    )
}

pub(crate) async fn new_post_submit(
    State(state): State<HttpState>,
    Form(form): Form<PostForm>,
) -> Response {
    let mode = EditorMode::Create;
    let content = match accept_submission(&state, &form) {
        Ok(content) => content,
        Err(errors) => return reject_submission(&state, mode, &form, errors),
    };

    match state.posts.create_post(content).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => editor_service_error(&state, mode, &form, err),
    }
}

pub(crate) async fn edit_post_form(
    State(state): State<HttpState>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(state.chrome.clone());
    };

    match state.posts.load_post(id).await {
        Ok(Some(post)) => render_editor(
            &state,
            EditorMode::Edit(id),
            &PostForm::from_post(&post),
            &PostFormErrors::default(),
            StatusCode::OK,
        ),
        Ok(None) => render_not_found_response(state.chrome.clone()),
        Err(err) => post_service_error_response(&state, EditorMode::Edit(id).source(), err),
    }
}

pub(crate) async fn edit_post_submit(
    State(state): State<HttpState>,
    Path(raw_id): Path<String>,
    Form(form): Form<PostForm>,
) -> Response {
    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(state.chrome.clone());
    };
    let mode = EditorMode::Edit(id);

    match state.posts.load_post(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return render_not_found_response(state.chrome.clone()),
        Err(err) => return post_service_error_response(&state, mode.source(), err),
    }

    let content = match accept_submission(&state, &form) {
        Ok(content) => content,
        Err(errors) => return reject_submission(&state, mode, &form, errors),
    };

    match state.posts.update_post(id, content).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => editor_service_error(&state, mode, &form, err),
    }
}

pub(crate) async fn delete_post(
    State(state): State<HttpState>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_post_id(&raw_id) else {
        return render_not_found_response(state.chrome.clone());
    };

    match state.posts.delete_post(id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => post_service_error_response(&state, "infra::http::posts::delete_post", err),
    }
}

/// Check the CSRF token and every field; all problems are reported at once.
fn accept_submission(state: &HttpState, form: &PostForm) -> Result<PostContent, PostFormErrors> {
    let mut errors = PostFormErrors::default();
    if let Err(err) = state.csrf.verify(form.csrf_token.as_deref()) {
        errors.add_form(err.to_string());
    }

    match form.validate() {
        Ok(valid) if errors.is_empty() => Ok(valid.into_content()),
        Ok(_) => Err(errors),
        Err(field_errors) => {
            errors.merge(field_errors);
            Err(errors)
        }
    }
}

fn reject_submission(
    state: &HttpState,
    mode: EditorMode,
    form: &PostForm,
    errors: PostFormErrors,
) -> Response {
    render_editor(state, mode, form, &errors, StatusCode::UNPROCESSABLE_ENTITY)
}

fn editor_service_error(
    state: &HttpState,
    mode: EditorMode,
    form: &PostForm,
    err: PostServiceError,
) -> Response {
    match err {
        PostServiceError::DuplicateTitle(_) => {
            let mut errors = PostFormErrors::default();
            errors.add_field("title", DUPLICATE_TITLE_MESSAGE);
            render_editor(state, mode, form, &errors, StatusCode::CONFLICT)
        }
        other => post_service_error_response(state, mode.source(), other),
    }
}

fn render_editor(
    state: &HttpState,
    mode: EditorMode,
    form: &PostForm,
    errors: &PostFormErrors,
    status: StatusCode,
) -> Response {
    let title = match mode {
        EditorMode::Create => "New Post",
        EditorMode::Edit(_) => "Edit Post",
    };
    let chrome = state.chrome.clone().with_title(title);
    let content = mode.view(form, errors, state.csrf.issue());
    let view = LayoutContext::new(chrome, content);

    let mut response = render_template_response(PostEditorTemplate { view }, status);
    if !errors.is_empty() && response.status() == status {
        ErrorReport::from_message(mode.source(), status, errors.summary()).attach(&mut response);
    }
    response
}
