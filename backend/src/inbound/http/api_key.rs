//! API-key gate for the `/user` routes.
//!
//! Every request must carry the configured key in the `access_token` header.
//! Rejections are answered with `401 Unauthorized` before any handler or body
//! extractor runs. Keys are compared through their SHA-256 digests so the
//! comparison time does not depend on how many leading bytes match.

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::ResponseError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::Error;

use super::ApiResult;

/// Request header carrying the API key.
pub const API_KEY_HEADER: &str = "access_token";

/// Length of the logged fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Errors raised when configuring an [`ApiKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiKeyError {
    /// The configured key was empty or whitespace only.
    #[error("API key must not be empty")]
    Empty,
}

/// The shared secret expected in [`API_KEY_HEADER`].
///
/// Only the SHA-256 digest of the secret is retained, and it is wiped on
/// drop.
///
/// # Examples
/// ```
/// use user_registry::inbound::http::api_key::ApiKey;
///
/// let key = ApiKey::new("s3cret").expect("non-empty key");
/// assert!(key.matches("s3cret"));
/// assert!(!key.matches("guess"));
/// assert_eq!(key.fingerprint().len(), 16);
/// ```
#[derive(Clone)]
pub struct ApiKey {
    digest: Zeroizing<[u8; 32]>,
}

impl ApiKey {
    /// Build a key from its secret value.
    ///
    /// # Errors
    /// Returns [`ApiKeyError::Empty`] for a blank secret.
    pub fn new(secret: impl Into<String>) -> Result<Self, ApiKeyError> {
        let secret = Zeroizing::new(secret.into());
        if secret.trim().is_empty() {
            return Err(ApiKeyError::Empty);
        }
        Ok(Self {
            digest: Zeroizing::new(sha256(&secret)),
        })
    }

    /// Whether `presented` equals the configured secret.
    pub fn matches(&self, presented: &str) -> bool {
        sha256(presented)
            .iter()
            .zip(self.digest.iter())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Truncated hex fingerprint for logs; safe to print.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.digest.as_slice());
        hex::encode(&hasher.finalize()[..FINGERPRINT_BYTES])
    }
}

fn sha256(value: &str) -> [u8; 32] {
    let mut digest = [0_u8; 32];
    digest.copy_from_slice(&Sha256::digest(value.as_bytes()));
    digest
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Check the presented header value against `key`.
///
/// # Errors
/// Returns an `unauthorized` error when the header is missing or wrong.
pub fn authorise(key: &ApiKey, presented: Option<&str>) -> ApiResult<()> {
    match presented {
        Some(value) if key.matches(value) => Ok(()),
        _ => Err(rejection(presented)),
    }
}

fn rejection(presented: Option<&str>) -> Error {
    match presented {
        Some(_) => Error::unauthorized("Invalid API key"),
        None => Error::unauthorized("Missing API key"),
    }
}

/// Middleware enforcing [`API_KEY_HEADER`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use user_registry::inbound::http::api_key::{ApiKey, ApiKeyGate};
///
/// let gate = ApiKeyGate::new(ApiKey::new("s3cret").expect("key"));
/// let _app = App::new().service(web::scope("/user").wrap(gate));
/// ```
#[derive(Clone)]
pub struct ApiKeyGate {
    key: Arc<ApiKey>,
}

impl ApiKeyGate {
    /// Gate requests on `key`.
    pub fn new(key: ApiKey) -> Self {
        Self { key: Arc::new(key) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = ApiKeyGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyGateMiddleware {
            service,
            key: Arc::clone(&self.key),
        }))
    }
}

/// Service wrapper produced by [`ApiKeyGate`].
pub struct ApiKeyGateMiddleware<S> {
    service: S,
    key: Arc<ApiKey>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let presented = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if presented
            .as_deref()
            .is_some_and(|value| self.key.matches(value))
        {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        // Build the error while polled so it captures the request trace id.
        Box::pin(async move {
            let error = rejection(presented.as_deref());
            debug!(
                path = req.path(),
                reason = error.message(),
                "request rejected by API key gate"
            );
            let response = error.error_response();
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
