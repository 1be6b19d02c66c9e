use std::{borrow::Cow, sync::LazyLock};

use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::BlogPost;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
}

/// Site-wide layout pieces shared by every page.
#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn for_site(site_title: &str) -> Self {
        let link = |label: &str, href: &str| NavigationLinkView {
            label: label.to_string(),
            href: href.to_string(),
        };

        Self {
            brand: BrandView {
                title: site_title.to_string(),
                href: "/".to_string(),
            },
            navigation: vec![
                link("Home", "/"),
                link("About", "/about"),
                link("Contact", "/contact"),
                link("New Post", "/new-post"),
            ],
            footer: FooterView {
                copy: format!("Copyright © {site_title}"),
            },
            meta: PageMetaView {
                title: site_title.to_string(),
                description: "A collection of random musings.".to_string(),
            },
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        let title = format!("{} | {}", title.into(), self.brand.title);
        Self {
            meta: PageMetaView { title, ..self.meta },
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub href: String,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<&BlogPost> for PostCard {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: post.date.clone(),
            href: format!("/post/{}", post.id),
            edit_href: format!("/edit/{}", post.id),
            delete_href: format!("/delete/{}", post.id),
        }
    }
}

pub struct IndexView {
    pub posts: Vec<PostCard>,
    pub new_post_href: String,
}

impl IndexView {
    pub fn new(posts: &[BlogPost]) -> Self {
        Self {
            posts: posts.iter().map(PostCard::from).collect(),
            new_post_href: "/new-post".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<IndexView>,
}

pub struct PostDetailView {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub img_url: String,
    /// Sanitized body, safe to emit unescaped.
    pub body_html: String,
    pub edit_href: String,
}

impl From<&BlogPost> for PostDetailView {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: post.date.clone(),
            img_url: post.img_url.clone(),
            body_html: sanitize_body(&post.body),
            edit_href: format!("/edit/{}", post.id),
        }
    }
}

static BODY_SANITIZER: LazyLock<ammonia::Builder<'static>> = LazyLock::new(build_body_sanitizer);

/// Default ammonia policy plus the `class` and `style` attributes the rich-text
/// editor writes. Styles that load resources are dropped.
fn build_body_sanitizer() -> ammonia::Builder<'static> {
    let mut builder = ammonia::Builder::default();
    builder.add_generic_attributes(&["class", "style"]);
    builder.attribute_filter(|_element, attribute, value| {
        if attribute.eq_ignore_ascii_case("style") {
            let lowered = value.to_ascii_lowercase();
            let loads_resource = ["url(", "expression(", "@import", "\\"]
                .iter()
                .any(|needle| lowered.contains(needle));
            (!loads_resource).then_some(Cow::Borrowed(value))
        } else {
            Some(Cow::Borrowed(value))
        }
    });
    builder
}

fn sanitize_body(body: &str) -> String {
    BODY_SANITIZER.clean(body).to_string()
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

#[derive(Clone)]
pub struct FormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub is_rich_text: bool,
    pub value: String,
    pub errors: Vec<String>,
}

pub struct PostEditorView {
    pub heading: String,
    pub subheading: String,
    pub action: String,
    pub submit_label: String,
    pub csrf_token: String,
    pub form_errors: Vec<String>,
    pub fields: Vec<FormFieldView>,
    /// Loads the rich-text editor script when any field needs it.
    pub has_rich_text: bool,
}

#[derive(Template)]
#[template(path = "make_post.html")]
pub struct PostEditorTemplate {
    pub view: LayoutContext<PostEditorView>,
}

pub struct StaticPageView {
    pub heading: String,
    pub subheading: String,
    pub paragraphs: Vec<String>,
}

impl StaticPageView {
    pub fn about() -> Self {
        Self {
            heading: "About Me".to_string(),
            subheading: "This is what I do.".to_string(),
            paragraphs: vec![
                "I write about whatever catches my attention: software, books, and the occasional long walk.".to_string(),
                "Every post here is written, edited, and published from this very site.".to_string(),
            ],
        }
    }

    pub fn contact() -> Self {
        Self {
            heading: "Contact Me".to_string(),
            subheading: "Have questions? I have answers.".to_string(),
            paragraphs: vec![
                "Want to get in touch? Drop me a line and I will get back to you as soon as I can.".to_string(),
            ],
        }
    }
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<StaticPageView>,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub view: LayoutContext<StaticPageView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: ErrorAction,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. It may have been deleted.".to_string(),
            primary_action: ErrorAction::home(),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to all posts".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> BlogPost {
        BlogPost {
            id: 4,
            title: "Hello <World>".to_string(),
            subtitle: "First words".to_string(),
            date: "October 18, 2026".to_string(),
            body: "<p>Hi</p><script>alert(1)</script>".to_string(),
            author: "Ada".to_string(),
            img_url: "https://images.example.com/a.jpg".to_string(),
        }
    }

    #[test]
    fn detail_view_strips_scripts_from_body() {
        let view = PostDetailView::from(&sample_post());
        assert!(view.body_html.contains("<p>Hi</p>"));
        assert!(!view.body_html.contains("<script"));
    }

    #[test]
    fn body_keeps_editor_formatting_but_not_resource_styles() {
        let html = sanitize_body(
            "<figure class=\"table\"><table><tr><td>1</td></tr></table></figure>\
             <p><span style=\"color:hsl(0,75%,60%);\">red</span></p>\
             <p style=\"background:url(https://evil.example/x.png)\">bg</p>",
        );

        assert!(html.contains("<figure class=\"table\">"));
        assert!(html.contains("style=\"color:hsl(0,75%,60%);\""));
        assert!(!html.contains("evil.example"));
        assert!(html.contains("<p>bg</p>"));
    }

    #[test]
    fn editor_loads_rich_text_script_only_when_needed() {
        let editor = |has_rich_text| PostEditorView {
            heading: "New Post".to_string(),
            subheading: String::new(),
            action: "/new-post".to_string(),
            submit_label: "Submit Post".to_string(),
            csrf_token: "token".to_string(),
            form_errors: Vec::new(),
            fields: Vec::new(),
            has_rich_text,
        };
        let render = |content| {
            let view = LayoutContext::new(LayoutChrome::for_site("Clean Blog"), content);
            PostEditorTemplate { view }.render().unwrap()
        };

        assert!(render(editor(true)).contains("ClassicEditor.create"));
        assert!(!render(editor(false)).contains("ClassicEditor"));
    }

    #[test]
    fn index_escapes_titles_and_links_actions() {
        let chrome = LayoutChrome::for_site("Clean Blog");
        let view = LayoutContext::new(chrome, IndexView::new(&[sample_post()]));
        let html = IndexTemplate { view }.render().unwrap();

        assert!(html.contains("Hello &#60;World&#62;") || html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("href=\"/post/4\""));
        assert!(html.contains("href=\"/edit/4\""));
        assert!(html.contains("href=\"/delete/4\""));
    }

    #[test]
    fn title_is_prefixed_onto_site_name() {
        let chrome = LayoutChrome::for_site("Clean Blog").with_title("About");
        assert_eq!(chrome.meta.title, "About | Clean Blog");
    }
}
