use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error, HttpMessage, HttpRequest,
};

use crate::{
    api::error,
    utils::{Claims, TypeClaims},
    ENV,
};

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get("Authorization").and_then(|h| h.to_str().ok());
    let token = match auth.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err(error::Error::unauthorized("Token Invalid or Expired").into());
        }
    };

    let claims = Claims::decode(token, ENV.jwt_secret.as_ref())
        .map_err(|_| error::Error::forbidden("Token Invalid or Expired"))?;

    // Refresh tokens only pass through /auth/refresh, never as a bearer.
    if claims._type == Some(TypeClaims::RefreshToken) {
        return Err(error::Error::forbidden("Token Invalid or Expired").into());
    }

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_extensions<T: Clone + 'static>(req: &HttpRequest) -> Result<T, error::Error> {
    let extensions = req.extensions();

    let value = extensions
        .get::<T>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(value)
}
