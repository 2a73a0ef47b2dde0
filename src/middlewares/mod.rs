use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error, HttpMessage, HttpRequest,
};
use futures_util::{future::LocalBoxFuture, FutureExt};
use std::rc::Rc;

use crate::utils::Claims;

/// Attach the caller's claims to the request when a valid bearer token is
/// present. Requests without one pass through untouched; handlers decide what
/// an anonymous caller gets.
pub fn identify<B>(
    secret: String,
) -> impl Fn(ServiceRequest, Next<B>) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>
where
    B: MessageBody + 'static,
{
    let secret = Rc::new(secret);
    move |req: ServiceRequest, next: Next<B>| {
        let secret = secret.clone();
        async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "));

            if let Some(token) = token {
                match Claims::decode(token, secret.as_bytes()) {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims);
                    }
                    Err(e) => log::debug!("Ignoring invalid bearer token: {}", e),
                }
            }

            next.call(req).await
        }
        .boxed_local()
    }
}

pub fn get_claims(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}
