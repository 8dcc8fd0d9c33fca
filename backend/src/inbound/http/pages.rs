//! Page endpoints: upsert, own/public lookup, partial update, delete.

use actix_web::{delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::page::{DEFAULT_THEME_COLOR, DEFAULT_THEME_FONT};
use crate::domain::{Page, PageDraft, PageUpdate};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, Message};

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_owned()
}

fn default_theme_font() -> String {
    DEFAULT_THEME_FONT.to_owned()
}

/// Creation body; optional fields fall back to the stock theme defaults.
#[derive(Debug, Deserialize)]
pub struct PageBody {
    /// Page title.
    pub title: String,
    /// Page description.
    #[serde(default)]
    pub description: String,
    /// Theme colour.
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    /// Theme font.
    #[serde(default = "default_theme_font")]
    pub theme_font: String,
}

impl From<PageBody> for PageDraft {
    fn from(body: PageBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            theme_color: body.theme_color,
            theme_font: body.theme_font,
        }
    }
}

/// Partial update body; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct PageUpdateBody {
    /// Replacement title, if provided.
    pub title: Option<String>,
    /// Replacement description, if provided.
    pub description: Option<String>,
    /// Replacement theme colour, if provided.
    pub theme_color: Option<String>,
    /// Replacement theme font, if provided.
    pub theme_font: Option<String>,
}

impl From<PageUpdateBody> for PageUpdate {
    fn from(body: PageUpdateBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            theme_color: body.theme_color,
            theme_font: body.theme_font,
        }
    }
}

/// Create the caller's page, or replace its fields if one exists.
#[post("/linkpage")]
pub async fn create_page(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    body: web::Json<PageBody>,
) -> ApiResult<web::Json<Page>> {
    let page = state
        .pages
        .upsert_page(auth.user_id(), body.into_inner().into())
        .await?;
    Ok(web::Json(page))
}

/// Fetch the caller's own page.
#[get("/linkpage/my")]
pub async fn my_page(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Page>> {
    let page = state.pages.own_page(auth.user_id()).await?;
    Ok(web::Json(page))
}

/// Public page lookup by handle; no authentication.
#[get("/linkpage/{username}")]
pub async fn public_page(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Page>> {
    let page = state.pages.public_page(&path.into_inner()).await?;
    Ok(web::Json(page))
}

/// Apply a partial update to the caller's page.
#[put("/linkpage")]
pub async fn update_page(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    body: web::Json<PageUpdateBody>,
) -> ApiResult<web::Json<Page>> {
    let page = state
        .pages
        .update_page(auth.user_id(), body.into_inner().into())
        .await?;
    Ok(web::Json(page))
}

/// Delete the caller's page.
#[delete("/linkpage")]
pub async fn delete_page(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Message>> {
    state.pages.delete_page(auth.user_id()).await?;
    Ok(web::Json(Message::new("Link page deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountDirectory, MockLinkCollection, MockPageRegistry};
    use crate::domain::{Error, UserId, Username};
    use crate::inbound::http::test_utils::{bearer_for, state_with};
    use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(state).service(
            web::scope("/api")
                .service(create_page)
                .service(my_page)
                .service(update_page)
                .service(delete_page)
                .service(public_page),
        )
    }

    fn pages_state(pages: MockPageRegistry) -> web::Data<HttpState> {
        state_with(MockAccountDirectory::new(), pages, MockLinkCollection::new())
    }

    fn sample_page(user_id: &UserId, title: &str) -> Page {
        Page::new(
            user_id.clone(),
            Username::new("ada").expect("valid username"),
            PageDraft {
                title: title.to_owned(),
                description: String::new(),
                theme_color: DEFAULT_THEME_COLOR.to_owned(),
                theme_font: DEFAULT_THEME_FONT.to_owned(),
            },
        )
    }

    #[actix_web::test]
    async fn create_page_applies_defaults_and_returns_the_page() {
        let user_id = UserId::random();
        let page = sample_page(&user_id, "Ada's Links");
        let mut pages = MockPageRegistry::new();
        pages
            .expect_upsert_page()
            .withf(|_, draft: &PageDraft| {
                draft.theme_color == DEFAULT_THEME_COLOR && draft.theme_font == DEFAULT_THEME_FONT
            })
            .times(1)
            .return_once(move |_, _| Ok(page));

        let state = pages_state(pages);
        let header = bearer_for(&state.tokens, &user_id);
        let app = test::init_service(test_app(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/linkpage")
                .insert_header(("Authorization", header))
                .set_json(json!({ "title": "Ada's Links" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["title"], "Ada's Links");
        assert_eq!(value["user_id"], user_id.to_string().as_str());
        assert_eq!(value["links"], json!([]));
    }

    #[actix_web::test]
    async fn my_page_reports_not_found() {
        let user_id = UserId::random();
        let mut pages = MockPageRegistry::new();
        pages
            .expect_own_page()
            .times(1)
            .return_once(|_| Err(Error::not_found("Link page not found")));

        let state = pages_state(pages);
        let header = bearer_for(&state.tokens, &user_id);
        let app = test::init_service(test_app(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/linkpage/my")
                .insert_header(("Authorization", header))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "Link page not found");
    }

    #[actix_web::test]
    async fn my_page_wins_over_the_public_username_route() {
        let user_id = UserId::random();
        let page = sample_page(&user_id, "mine");
        let mut pages = MockPageRegistry::new();
        pages
            .expect_own_page()
            .times(1)
            .return_once(move |_| Ok(page));
        // A route mix-up would land on public_page("my") instead.
        pages.expect_public_page().times(0);

        let state = pages_state(pages);
        let header = bearer_for(&state.tokens, &user_id);
        let app = test::init_service(test_app(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/linkpage/my")
                .insert_header(("Authorization", header))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn public_page_needs_no_token() {
        let page = sample_page(&UserId::random(), "public");
        let mut pages = MockPageRegistry::new();
        pages
            .expect_public_page()
            .withf(|username| username == "ada")
            .times(1)
            .return_once(move |_| Ok(page));

        let app = test::init_service(test_app(pages_state(pages))).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/linkpage/ada").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["username"], "ada");
    }

    #[actix_web::test]
    async fn update_page_passes_only_provided_fields() {
        let user_id = UserId::random();
        let page = sample_page(&user_id, "updated");
        let mut pages = MockPageRegistry::new();
        pages
            .expect_update_page()
            .withf(|_, update: &PageUpdate| {
                update.title.as_deref() == Some("updated")
                    && update.description.is_none()
                    && update.theme_color.as_deref() == Some("#EF4444")
                    && update.theme_font.is_none()
            })
            .times(1)
            .return_once(move |_, _| Ok(page));

        let state = pages_state(pages);
        let header = bearer_for(&state.tokens, &user_id);
        let app = test::init_service(test_app(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/linkpage")
                .insert_header(("Authorization", header))
                .set_json(json!({ "title": "updated", "theme_color": "#EF4444" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn delete_page_returns_the_success_message() {
        let user_id = UserId::random();
        let mut pages = MockPageRegistry::new();
        pages.expect_delete_page().times(1).return_once(|_| Ok(()));

        let state = pages_state(pages);
        let header = bearer_for(&state.tokens, &user_id);
        let app = test::init_service(test_app(state)).await;
        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/linkpage")
                .insert_header(("Authorization", header))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["message"], "Link page deleted successfully");
    }

    #[actix_web::test]
    async fn page_mutations_require_a_token() {
        let app = test::init_service(test_app(pages_state(MockPageRegistry::new()))).await;
        for request in [
            test::TestRequest::post()
                .uri("/api/linkpage")
                .set_json(json!({ "title": "x" }))
                .to_request(),
            test::TestRequest::get().uri("/api/linkpage/my").to_request(),
            test::TestRequest::put()
                .uri("/api/linkpage")
                .set_json(json!({}))
                .to_request(),
            test::TestRequest::delete().uri("/api/linkpage").to_request(),
        ] {
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
