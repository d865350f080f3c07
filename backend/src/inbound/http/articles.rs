//! Article API handlers.
//!
//! ```text
//! GET    /api/v1/articles                      published articles
//! GET    /api/v1/articles/{id}                 article + comments
//! GET    /api/v1/author/articles               dashboard (auth)
//! POST   /api/v1/author/articles               create draft (auth)
//! PUT    /api/v1/author/articles/{id}          edit (auth + owner)
//! POST   /api/v1/author/articles/{id}/publish  publish (auth)
//! DELETE /api/v1/author/articles/{id}          delete (auth + owner)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Article, ArticleFields, ArticleId, ArticleValidationError, AuthorShelf, Comment, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_user;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Article content body shared by draft creation and editing.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub body: String,
}

impl TryFrom<ArticleRequest> for ArticleFields {
    type Error = ArticleValidationError;

    fn try_from(value: ArticleRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.title, value.subtitle.as_deref(), &value.body)
    }
}

/// Article detail payload: the article plus its comment log.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    pub article: Article,
    pub comments: Vec<Comment>,
}

fn map_article_validation_error(err: ArticleValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "title" }))
}

/// List published articles, newest publication first.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    responses(
        (status = 200, description = "Published articles", body = [Article]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listPublishedArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Article>>> {
    let articles = state.articles_query.list_published().await?;
    Ok(web::Json(articles))
}

/// Fetch one article with its comments.
///
/// Drafts resolve only for their author; other viewers receive 404.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article detail", body = ArticleDetail),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id}")]
pub async fn get_article(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ArticleDetail>> {
    let id = ArticleId::from_uuid(path.into_inner());
    let viewer = session.user_id()?;

    let article = state.articles_query.fetch_for_reader(&id, viewer).await?;
    let comments = state.engagement_query.comments_for(&id).await?;
    Ok(web::Json(ArticleDetail { article, comments }))
}

/// The authenticated author's dashboard: published articles and drafts.
#[utoipa::path(
    get,
    path = "/api/v1/author/articles",
    responses(
        (status = 200, description = "Author shelf", body = AuthorShelf),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "authorShelf"
)]
#[get("/author/articles")]
pub async fn author_shelf(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<AuthorShelf>> {
    let author = require_user(&session, &state).await?;
    let shelf = state.articles_query.shelf_for_author(author.id()).await?;
    Ok(web::Json(shelf))
}

/// Create a new draft owned by the authenticated author.
#[utoipa::path(
    post,
    path = "/api/v1/author/articles",
    request_body = ArticleRequest,
    responses(
        (status = 201, description = "Draft created", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "createDraft"
)]
#[post("/author/articles")]
pub async fn create_draft(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<ArticleRequest>,
) -> ApiResult<HttpResponse> {
    let author = require_user(&session, &state).await?;
    let fields =
        ArticleFields::try_from(payload.into_inner()).map_err(map_article_validation_error)?;

    let article = state.articles.create_draft(author.id(), fields).await?;
    Ok(HttpResponse::Created().json(article))
}

/// Edit an article's content; permitted in any lifecycle state.
#[utoipa::path(
    put,
    path = "/api/v1/author/articles/{id}",
    params(("id" = Uuid, Path, description = "Article id")),
    request_body = ArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owning author", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "editArticle"
)]
#[put("/author/articles/{id}")]
pub async fn edit_article(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<ArticleRequest>,
) -> ApiResult<web::Json<Article>> {
    let author = require_user(&session, &state).await?;
    let id = ArticleId::from_uuid(path.into_inner());
    let fields =
        ArticleFields::try_from(payload.into_inner()).map_err(map_article_validation_error)?;

    let article = state.articles.edit(&id, author.id(), fields).await?;
    Ok(web::Json(article))
}

/// Publish an article; repeat publishes keep the original timestamp.
#[utoipa::path(
    post,
    path = "/api/v1/author/articles/{id}/publish",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article published", body = Article),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "publishArticle"
)]
#[post("/author/articles/{id}/publish")]
pub async fn publish_article(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Article>> {
    let _ = require_user(&session, &state).await?;
    let id = ArticleId::from_uuid(path.into_inner());

    let article = state.articles.publish(&id).await?;
    Ok(web::Json(article))
}

/// Delete an article along with its comments and likes.
#[utoipa::path(
    delete,
    path = "/api/v1/author/articles/{id}",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owning author", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/author/articles/{id}")]
pub async fn delete_article(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let author = require_user(&session, &state).await?;
    let id = ArticleId::from_uuid(path.into_inner());

    state.articles.delete(&id, author.id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockArticleQuery;
    use crate::test_support::{memory_http_state, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    fn app_with_state(
        state: crate::inbound::http::state::HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .service(crate::inbound::http::users::register)
                .service(list_articles)
                .service(get_article)
                .service(author_shelf)
                .service(create_draft)
                .service(edit_article)
                .service(publish_article)
                .service(delete_article),
        )
    }

    async fn register_and_cookie<S, B>(app: &S, email: &str) -> actix_web::cookie::Cookie<'static>
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(crate::inbound::http::users::RegisterRequest {
                    display_name: "Ann".into(),
                    email: email.into(),
                    password: "pw123".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn draft_creation_requires_a_session() {
        let app = actix_test::init_service(app_with_state(memory_http_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/author/articles")
                .set_json(ArticleRequest {
                    title: "Hello".into(),
                    subtitle: None,
                    body: "World".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn blank_titles_are_rejected_with_field_details() {
        let app = actix_test::init_service(app_with_state(memory_http_state())).await;
        let cookie = register_and_cookie(&app, "ann@x.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/author/articles")
                .cookie(cookie)
                .set_json(ArticleRequest {
                    title: "   ".into(),
                    subtitle: None,
                    body: "World".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            value
                .get("details")
                .and_then(|details| details.get("field"))
                .and_then(Value::as_str),
            Some("title")
        );
    }

    #[actix_web::test]
    async fn drafts_stay_off_the_public_listing_until_published() {
        let app = actix_test::init_service(app_with_state(memory_http_state())).await;
        let cookie = register_and_cookie(&app, "ann@x.com").await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/author/articles")
                .cookie(cookie.clone())
                .set_json(ArticleRequest {
                    title: "Hello".into(),
                    subtitle: Some(String::new()),
                    body: "World".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let draft: Value = actix_test::read_body_json(created).await;
        let draft_id = draft.get("id").and_then(Value::as_str).expect("id");

        let listing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/articles").to_request(),
        )
        .await;
        let articles: Value = actix_test::read_body_json(listing).await;
        assert_eq!(articles.as_array().map(Vec::len), Some(0));

        let published = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/author/articles/{draft_id}/publish"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(published.status(), StatusCode::OK);

        let listing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/articles").to_request(),
        )
        .await;
        let articles: Value = actix_test::read_body_json(listing).await;
        assert_eq!(articles.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn editing_someone_elses_article_is_forbidden() {
        let app = actix_test::init_service(app_with_state(memory_http_state())).await;
        let owner = register_and_cookie(&app, "ann@x.com").await;
        let intruder = register_and_cookie(&app, "mallory@x.com").await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/author/articles")
                .cookie(owner)
                .set_json(ArticleRequest {
                    title: "Hello".into(),
                    subtitle: None,
                    body: "World".into(),
                })
                .to_request(),
        )
        .await;
        let draft: Value = actix_test::read_body_json(created).await;
        let draft_id = draft.get("id").and_then(Value::as_str).expect("id");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/author/articles/{draft_id}"))
                .cookie(intruder)
                .set_json(ArticleRequest {
                    title: "Stolen".into(),
                    subtitle: None,
                    body: "Content".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn listing_failures_surface_as_service_unavailable() {
        let mut query = MockArticleQuery::new();
        query
            .expect_list_published()
            .returning(|| Err(Error::service_unavailable("store down")));

        let mut state = memory_http_state();
        state.articles_query = Arc::new(query);

        let app = actix_test::init_service(app_with_state(state)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/articles").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
