//! Server-rendered HTML pages.
//!
//! Pages share [`ProfileService`] with the JSON API. Successful form posts
//! redirect (303) to the list page with a `notice` query parameter that
//! selects the banner; rejected posts re-render the form with status 200.
//!
//! Markup comes from Handlebars templates registered once in [`PageTemplates`].
//! `{{value}}` expressions are HTML-escaped, so user-supplied fields are never
//! written into a page raw.

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::error::{ProfileError, WriteOp};
use crate::models::{ProfileForm, User};
use crate::repository::ProfileRepository;
use crate::service::ProfileService;
use crate::validation::ValidationErrors;

/// Router for `/`, `/register` and `/update/{id}`.
///
/// Fails only if a page template does not parse.
pub fn router<R: ProfileRepository + 'static>(
    service: ProfileService<R>,
) -> Result<Router, TemplateError> {
    let state = Arc::new(PageState {
        service,
        templates: PageTemplates::new()?,
    });

    Ok(Router::new()
        .route("/", get(index))
        .route("/register", get(register_form).post(register))
        .route("/update/{id}", get(update_form).post(update))
        .with_state(state))
}

struct PageState<R: ProfileRepository> {
    service: ProfileService<R>,
    templates: PageTemplates,
}

#[derive(Debug, Default, Deserialize)]
struct IndexQuery {
    notice: Option<String>,
}

async fn index<R: ProfileRepository>(
    State(state): State<Arc<PageState<R>>>,
    Query(query): Query<IndexQuery>,
) -> Response {
    match state.service.list_profiles().await {
        Ok(users) => html(
            StatusCode::OK,
            state.templates.index(&users, query.notice.as_deref()),
        ),
        Err(e) => error_page(&state.templates, e),
    }
}

async fn register_form<R: ProfileRepository>(State(state): State<Arc<PageState<R>>>) -> Response {
    html(
        StatusCode::OK,
        state
            .templates
            .form(&FormPage::register(), &ProfileForm::default(), None, None),
    )
}

async fn register<R: ProfileRepository>(
    State(state): State<Arc<PageState<R>>>,
    Form(form): Form<ProfileForm>,
) -> Response {
    match state.service.create_profile(form.clone().into()).await {
        Ok(_) => Redirect::to("/?notice=created").into_response(),
        Err(e) => rejected_form(&state.templates, &FormPage::register(), &form, e),
    }
}

async fn update_form<R: ProfileRepository>(
    State(state): State<Arc<PageState<R>>>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return not_found_page(&state.templates);
    };

    match state.service.get_profile(id).await {
        Ok(user) => {
            let form = ProfileForm::from(&user);
            html(
                StatusCode::OK,
                state.templates.form(&FormPage::update(&user), &form, None, None),
            )
        }
        Err(e) => error_page(&state.templates, e),
    }
}

async fn update<R: ProfileRepository>(
    State(state): State<Arc<PageState<R>>>,
    Path(raw_id): Path<String>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return not_found_page(&state.templates);
    };

    match state.service.update_profile(id, form.clone().into()).await {
        Ok(_) => Redirect::to("/?notice=updated").into_response(),
        Err(ProfileError::NotFound(_)) => not_found_page(&state.templates),
        Err(e) => {
            // The heading still names the stored user, not the rejected edit
            match state.service.get_profile(id).await {
                Ok(user) => rejected_form(&state.templates, &FormPage::update(&user), &form, e),
                Err(lookup) => error_page(&state.templates, lookup),
            }
        }
    }
}

fn parse_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// Re-render after a validation or duplicate-email failure
fn rejected_form(
    templates: &PageTemplates,
    page: &FormPage,
    form: &ProfileForm,
    err: ProfileError,
) -> Response {
    match err {
        ProfileError::Validation(errors) => {
            html(StatusCode::OK, templates.form(page, form, Some(&errors), None))
        }
        ProfileError::DuplicateEmail { op, .. } => {
            let flash = match op {
                WriteOp::Create => "Email already registered.",
                WriteOp::Update => "Email already registered by another user.",
            };
            html(StatusCode::OK, templates.form(page, form, None, Some(flash)))
        }
        other => error_page(templates, other),
    }
}

fn error_page(templates: &PageTemplates, err: ProfileError) -> Response {
    match err {
        ProfileError::NotFound(_) => not_found_page(templates),
        other => {
            tracing::error!(error = %other, "Page request failed");
            html(
                StatusCode::INTERNAL_SERVER_ERROR,
                templates.message("Something went wrong", "Please try again later."),
            )
        }
    }
}

fn not_found_page(templates: &PageTemplates) -> Response {
    html(
        StatusCode::NOT_FOUND,
        templates.message("Not Found", "No profile with that id."),
    )
}

fn html(status: StatusCode, rendered: Result<String, RenderError>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(RENDER_FAILED_PAGE)).into_response()
        }
    }
}

/// Heading, submit label and target of a form page
struct FormPage {
    title: String,
    action: String,
    submit: &'static str,
}

impl FormPage {
    fn register() -> Self {
        Self {
            title: "Register".to_string(),
            action: "/register".to_string(),
            submit: "Register",
        }
    }

    fn update(user: &User) -> Self {
        Self {
            title: format!("Update {}", user.fullname),
            action: format!("/update/{}", user.id),
            submit: "Update",
        }
    }
}

fn notice_banner(notice: Option<&str>) -> Option<&'static str> {
    match notice? {
        "created" => Some("Profile created successfully."),
        "updated" => Some("Profile updated."),
        _ => None,
    }
}

/// Page templates, each rendered into the shared layout.
pub struct PageTemplates {
    handlebars: Handlebars<'static>,
}

impl PageTemplates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();

        handlebars.register_template_string("layout", LAYOUT_TEMPLATE)?;
        handlebars.register_template_string("index", INDEX_TEMPLATE)?;
        handlebars.register_template_string("form", FORM_TEMPLATE)?;
        handlebars.register_template_string("message", MESSAGE_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Render `name` with `data`, then wrap it in the layout.
    fn render(&self, name: &str, title: &str, data: &Value) -> Result<String, RenderError> {
        let content = self.handlebars.render(name, data)?;
        self.handlebars
            .render("layout", &json!({ "title": title, "content": content }))
    }

    /// Profile list with an optional success banner
    pub fn index(&self, users: &[User], notice: Option<&str>) -> Result<String, RenderError> {
        let data = json!({
            "notice": notice_banner(notice),
            "users": users,
        });
        self.render("index", "Profiles", &data)
    }

    /// Register or update form, echoing the submitted values.
    fn form(
        &self,
        page: &FormPage,
        form: &ProfileForm,
        errors: Option<&ValidationErrors>,
        flash: Option<&str>,
    ) -> Result<String, RenderError> {
        let field_errors: Map<String, Value> = errors
            .into_iter()
            .flatten()
            .map(|e| (e.field.to_string(), Value::String(e.form_message())))
            .collect();

        let data = json!({
            "action": page.action,
            "submit": page.submit,
            "flash": flash,
            "form": form,
            "errors": field_errors,
        });
        self.render("form", &page.title, &data)
    }

    pub fn message(&self, title: &str, message: &str) -> Result<String, RenderError> {
        self.render("message", title, &json!({ "message": message }))
    }
}

/// Served when a template fails to render
const RENDER_FAILED_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Error - Profiles</title></head>
<body><p>Something went wrong. Please try again later.</p></body>
</html>"#;

const LAYOUT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}} - Profiles</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
        .container { max-width: 900px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px; }
        nav a { margin-right: 15px; color: #007bff; text-decoration: none; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background: #f8f9fa; font-weight: 600; }
        .alert { padding: 10px 15px; border-radius: 4px; margin: 15px 0; }
        .alert-success { background: #d4edda; color: #155724; }
        .alert-danger { background: #f8d7da; color: #721c24; }
        label { display: block; margin-top: 12px; font-weight: 600; }
        input, textarea { width: 100%; padding: 8px; box-sizing: border-box; }
        .error { color: #c0392b; font-size: 0.9em; }
        button { margin-top: 16px; padding: 8px 20px; background: #007bff; color: white; border: none; border-radius: 4px; cursor: pointer; }
    </style>
</head>
<body>
    <div class="container">
        <nav><a href="/">Profiles</a><a href="/register">Register</a></nav>
        <h1>{{title}}</h1>
        {{{content}}}
    </div>
</body>
</html>"#;

const INDEX_TEMPLATE: &str = r#"{{#if notice}}<div class="alert alert-success">{{notice}}</div>{{/if}}
{{#if users}}
<table>
    <thead><tr><th>Name</th><th>Email</th><th>Age</th><th>Bio</th><th></th></tr></thead>
    <tbody>
    {{#each users}}
        <tr><td>{{fullname}}</td><td>{{email}}</td><td>{{age}}</td><td>{{bio}}</td><td><a href="/update/{{id}}">Edit</a></td></tr>
    {{/each}}
    </tbody>
</table>
{{else}}
<p>No profiles yet.</p>
{{/if}}"#;

const FORM_TEMPLATE: &str = r#"{{#if flash}}<div class="alert alert-danger">{{flash}}</div>{{/if}}
<form method="post" action="{{action}}">
    <label for="fullname">Full Name</label>
    <input id="fullname" name="fullname" type="text" value="{{form.fullname}}">
    {{#if errors.fullname}}<div class="error">{{errors.fullname}}</div>{{/if}}
    <label for="email">Email</label>
    <input id="email" name="email" type="text" value="{{form.email}}">
    {{#if errors.email}}<div class="error">{{errors.email}}</div>{{/if}}
    <label for="age">Age</label>
    <input id="age" name="age" type="text" value="{{form.age}}">
    {{#if errors.age}}<div class="error">{{errors.age}}</div>{{/if}}
    <label for="bio">Bio</label>
    <textarea id="bio" name="bio" rows="4">{{form.bio}}</textarea>
    <button type="submit">{{submit}}</button>
</form>"#;

const MESSAGE_TEMPLATE: &str = r#"<p>{{message}}</p>"#;
