use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    abstract_trait::{DynJwtService, TokenType},
    errors::HttpError,
};
use tracing::warn;

/// Shopper identity: the `token` cookie or a bearer token of type `access`.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    authorize(&cookie_jar, &jwt, "token", TokenType::Access, req, next).await
}

/// Store operator identity: the `sellerToken` cookie or a bearer token of
/// type `seller`.
pub async fn seller_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    authorize(&cookie_jar, &jwt, "sellerToken", TokenType::Seller, req, next).await
}

async fn authorize(
    cookie_jar: &CookieJar,
    jwt: &DynJwtService,
    cookie_name: &str,
    token_type: TokenType,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let token = cookie_jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        });

    let Some(token) = token else {
        return Err(HttpError::Unauthorized(
            "You are not logged in, please provide token".into(),
        ));
    };

    let user_id = jwt.verify_token(&token, token_type).map_err(|err| {
        warn!("🔒 Rejected {token_type} token: {err}");
        HttpError::from(err)
    })?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}
