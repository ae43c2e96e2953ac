use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

use crate::http::jwt::Jwt;
use crate::http::{Error, ErrorKind};
use crate::models::id::UserId;
use crate::App;

/// The identity resolved from a verified bearer token.
///
/// Extracting this is the authorization gate: handlers that take an
/// `Identity` argument can only run once the caller's token checked out,
/// and every lookup they perform is scoped by this identity rather than
/// anything the client supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        // Verification is idempotent: a request already carries the
        // resolved identity after the first extraction.
        if let Some(identity) = req.extensions().get::<Identity>().cloned() {
            return ready(Ok(identity));
        }

        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let Some(token) = header.and_then(|v| v.strip_prefix("Bearer ")) else {
            return ready(Err(Error::new(ErrorKind::Unauthenticated)));
        };

        let app = req
            .app_data::<web::Data<App>>()
            .expect("web::Data<App> is missing");

        match Jwt::decode(&app.config, token) {
            Ok(claims) => {
                let identity = Identity {
                    id: claims.sub,
                    username: claims.name,
                };
                req.extensions_mut().insert(identity.clone());
                ready(Ok(identity))
            }
            Err(error) => {
                tracing::debug!(%error, "rejected bearer token");
                ready(Err(Error::from(error)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Identity;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, HttpResponse};

    use crate::http::jwt::Jwt;
    use crate::models::id::UserId;
    use crate::App;

    async fn guarded(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "id": identity.id,
            "username": identity.username,
        }))
    }

    fn test_app() -> App {
        App::for_tests()
    }

    async fn call(app: App, request: test::TestRequest) -> StatusCode {
        let service = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(app))
                .route("/guarded", web::get().to(guarded)),
        )
        .await;

        test::call_service(&service, request.uri("/guarded").to_request())
            .await
            .status()
    }

    #[actix_web::test]
    async fn rejects_requests_without_a_token() {
        let status = call(test_app(), test::TestRequest::get()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn rejects_malformed_authorization_headers() {
        let request =
            test::TestRequest::get().insert_header(("Authorization", "Token abcdef"));
        let status = call(test_app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn rejects_forged_tokens() {
        let request = test::TestRequest::get()
            .insert_header(("Authorization", "Bearer not-a-real-token"));
        let status = call(test_app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn admits_requests_with_a_valid_token() {
        let app = test_app();
        let token = Jwt::generate(UserId(1), "admin".to_string())
            .encode(&app.config)
            .expect("should encode");

        let request = test::TestRequest::get()
            .insert_header(("Authorization", format!("Bearer {token}")));
        let status = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}
