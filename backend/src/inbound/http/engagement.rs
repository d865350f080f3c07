//! Engagement API handlers: comments and likes.
//!
//! ```text
//! POST /api/v1/articles/{id}/comments  anonymous allowed
//! POST /api/v1/articles/{id}/likes     authenticated, idempotent
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Article, ArticleId, Comment, CommentContent, CommentValidationError, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_user;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Comment request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
}

fn map_comment_validation_error(err: CommentValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "content" }))
}

/// Append a comment to an article.
///
/// Anonymous commenting is allowed; when a session is present the comment is
/// attributed to its user.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/comments",
    params(("id" = Uuid, Path, description = "Article id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment appended", body = Comment),
        (status = 400, description = "Empty comment", body = Error),
        (status = 404, description = "Article not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "addComment",
    security([])
)]
#[post("/articles/{id}/comments")]
pub async fn add_comment(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let id = ArticleId::from_uuid(path.into_inner());
    let content = CommentContent::new(payload.into_inner().content)
        .map_err(map_comment_validation_error)?;

    // Re-resolve the session user if any; a stale session degrades to an
    // anonymous comment rather than an error.
    let author = match session.user_id()? {
        Some(user_id) => state.profile.fetch(&user_id).await?,
        None => None,
    };

    let comment = state.engagement.add_comment(&id, author, content).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Like an article.
///
/// Requires authentication. Repeat likes from the same user are benign
/// no-ops; the response always carries the article with its current count.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/likes",
    params(("id" = Uuid, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article with updated like count", body = Article),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Article not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "likeArticle"
)]
#[post("/articles/{id}/likes")]
pub async fn like_article(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Article>> {
    let user = require_user(&session, &state).await?;
    let id = ArticleId::from_uuid(path.into_inner());

    let article = state.engagement.like(&id, user.id()).await?;
    Ok(web::Json(article))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_http_state, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(memory_http_state()))
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .service(crate::inbound::http::users::register)
                    .service(crate::inbound::http::articles::create_draft)
                    .service(crate::inbound::http::articles::publish_article)
                    .service(add_comment)
                    .service(like_article),
            )
    }

    async fn seed_published_article<S, B>(app: &S) -> (String, actix_web::cookie::Cookie<'static>)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let registered = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(crate::inbound::http::users::RegisterRequest {
                    display_name: "Ann".into(),
                    email: "ann@x.com".into(),
                    password: "pw123".into(),
                })
                .to_request(),
        )
        .await;
        let cookie = registered
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();

        let created = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/author/articles")
                .cookie(cookie.clone())
                .set_json(crate::inbound::http::articles::ArticleRequest {
                    title: "Hello".into(),
                    subtitle: None,
                    body: "World".into(),
                })
                .to_request(),
        )
        .await;
        let draft: Value = actix_test::read_body_json(created).await;
        let id = draft
            .get("id")
            .and_then(Value::as_str)
            .expect("id")
            .to_owned();

        let published = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/author/articles/{id}/publish"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(published.status(), StatusCode::OK);

        (id, cookie)
    }

    #[actix_web::test]
    async fn anonymous_comments_are_accepted() {
        let app = actix_test::init_service(test_app()).await;
        let (article_id, _) = seed_published_article(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/articles/{article_id}/comments"))
                .set_json(CommentRequest {
                    content: "nice post".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let value: Value = actix_test::read_body_json(response).await;
        assert!(value.get("authorName").is_none());
        assert_eq!(
            value.get("content").and_then(Value::as_str),
            Some("nice post")
        );
    }

    #[actix_web::test]
    async fn empty_comments_are_rejected() {
        let app = actix_test::init_service(test_app()).await;
        let (article_id, _) = seed_published_article(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/articles/{article_id}/comments"))
                .set_json(CommentRequest {
                    content: "   ".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn anonymous_likes_are_rejected_by_the_gate() {
        let app = actix_test::init_service(test_app()).await;
        let (article_id, _) = seed_published_article(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/articles/{article_id}/likes"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn likes_are_idempotent_per_user() {
        let app = actix_test::init_service(test_app()).await;
        let (article_id, cookie) = seed_published_article(&app).await;

        for expected in [1, 1] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri(&format!("/api/v1/articles/{article_id}/likes"))
                    .cookie(cookie.clone())
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            let value: Value = actix_test::read_body_json(response).await;
            assert_eq!(value.get("likeCount").and_then(Value::as_i64), Some(expected));
        }
    }

    #[actix_web::test]
    async fn liking_a_missing_article_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let (_, cookie) = seed_published_article(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/articles/{}/likes", Uuid::new_v4()))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
