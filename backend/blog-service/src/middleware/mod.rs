/// HTTP middleware utilities for blog-service
///
/// The identity middleware resolves the bearer token once per request and
/// records the outcome in request extensions. It never rejects on its own:
/// public routes ignore the outcome, protected handlers take a [`UserId`]
/// argument whose extractor turns a missing or bad token into a 401.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header, web, Error, FromRequest, HttpMessage, HttpRequest};
use crypto_core::{TokenError, TokenIssuer};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// Outcome of token resolution for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No `Authorization` header
    Anonymous,
    User(Uuid),
    /// A header was sent but did not hold a valid bearer token
    Rejected(TokenError),
}

impl Identity {
    pub fn from_header(value: Option<&header::HeaderValue>, tokens: &TokenIssuer) -> Self {
        let Some(value) = value else {
            return Identity::Anonymous;
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        match token {
            Some(token) => match tokens.verify(token) {
                Ok(user_id) => Identity::User(user_id),
                Err(err) => Identity::Rejected(err),
            },
            None => Identity::Rejected(TokenError::Malformed),
        }
    }
}

/// Authenticated user for the current request
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<Identity>() {
            Some(Identity::User(id)) => Ok(UserId(*id)),
            Some(Identity::Rejected(err)) => Err(AppError::from(err.clone())),
            Some(Identity::Anonymous) | None => Err(AppError::Unauthenticated(
                "Not authorized, no token".to_string(),
            )),
        };

        ready(result.map_err(Error::from))
    }
}

/// Actix middleware that resolves the bearer token into an [`Identity`].
pub struct IdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let identity = {
                let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                    AppError::Internal("application state not configured".to_string())
                })?;
                Identity::from_header(req.headers().get(header::AUTHORIZATION), &state.tokens)
            };

            if let Identity::Rejected(err) = &identity {
                tracing::debug!(error = %err, path = %req.path(), "bearer token rejected");
            }

            req.extensions_mut().insert(identity);
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"middleware-unit-test-secret-0123456789")
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(Identity::from_header(None, &issuer()), Identity::Anonymous);
    }

    #[test]
    fn test_valid_bearer_token() {
        let tokens = issuer();
        let user_id = Uuid::new_v4();
        let value = HeaderValue::from_str(&format!("Bearer {}", tokens.issue(user_id).unwrap()))
            .unwrap();

        assert_eq!(
            Identity::from_header(Some(&value), &tokens),
            Identity::User(user_id)
        );
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let value = HeaderValue::from_static("Basic dXNlcjpwYXNz");
        assert_eq!(
            Identity::from_header(Some(&value), &issuer()),
            Identity::Rejected(TokenError::Malformed)
        );
    }

    #[test]
    fn test_foreign_token_rejected() {
        let other = TokenIssuer::new(b"some-other-service-secret-abcdefghij");
        let value =
            HeaderValue::from_str(&format!("Bearer {}", other.issue(Uuid::new_v4()).unwrap()))
                .unwrap();

        assert_eq!(
            Identity::from_header(Some(&value), &issuer()),
            Identity::Rejected(TokenError::InvalidSignature)
        );
    }
}
