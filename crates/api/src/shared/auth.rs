use crate::error::NotifierError;
use actix_web::HttpRequest;
use notifier_infra::NotifierContext;
use notifier_utils::secrets_match;

pub const ADMIN_API_KEY_HEADER: &str = "x-api-key";
pub const TRIGGER_SECRET_HEADER: &str = "notifier-trigger-secret";

fn get_secret_header<'a>(req: &'a HttpRequest, header: &str) -> Result<&'a str, NotifierError> {
    match req.headers().get(header) {
        Some(secret) => secret.to_str().map_err(|_| {
            NotifierError::Unauthorized(format!("Malformed secret provided in {} header", header))
        }),
        None => Err(NotifierError::Unauthorized(format!(
            "Unable to find secret in {} header",
            header
        ))),
    }
}

/// Only administrators holding the admin api key can manage reminders and recipients
pub fn protect_admin_route(req: &HttpRequest, ctx: &NotifierContext) -> Result<(), NotifierError> {
    let api_key = get_secret_header(req, ADMIN_API_KEY_HEADER)?;
    if !secrets_match(&ctx.config.admin_api_key, api_key) {
        return Err(NotifierError::Unauthorized(format!(
            "Invalid api-key provided in {} header",
            ADMIN_API_KEY_HEADER
        )));
    }
    Ok(())
}

/// Only the external timer holding the trigger secret can start due processing
pub fn protect_trigger_route(
    req: &HttpRequest,
    ctx: &NotifierContext,
) -> Result<(), NotifierError> {
    let secret = get_secret_header(req, TRIGGER_SECRET_HEADER)?;
    if !secrets_match(&ctx.config.trigger_secret, secret) {
        return Err(NotifierError::Unauthorized(format!(
            "Invalid secret provided in {} header",
            TRIGGER_SECRET_HEADER
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::test::TestRequest;

    fn get_context() -> NotifierContext {
        let mut ctx = NotifierContext::create_inmemory();
        ctx.config.admin_api_key = "admin-key".into();
        ctx.config.trigger_secret = "trigger-secret".into();
        ctx
    }

    #[test]
    fn accepts_valid_admin_key() {
        let ctx = get_context();
        let req = TestRequest::default()
            .insert_header((ADMIN_API_KEY_HEADER, "admin-key"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_ok());
    }

    #[test]
    fn rejects_invalid_admin_key() {
        let ctx = get_context();
        let req = TestRequest::default()
            .insert_header((ADMIN_API_KEY_HEADER, "admin-keyy"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());

        // The trigger secret does not grant admin access
        let req = TestRequest::default()
            .insert_header((ADMIN_API_KEY_HEADER, "trigger-secret"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());
    }

    #[test]
    fn rejects_req_without_headers() {
        let ctx = get_context();
        let req = TestRequest::default().to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());
        assert!(protect_trigger_route(&req, &ctx).is_err());
    }

    #[test]
    fn accepts_valid_trigger_secret() {
        let ctx = get_context();
        let req = TestRequest::default()
            .insert_header((TRIGGER_SECRET_HEADER, "trigger-secret"))
            .to_http_request();
        assert!(protect_trigger_route(&req, &ctx).is_ok());

        let req = TestRequest::default()
            .insert_header((TRIGGER_SECRET_HEADER, "admin-key"))
            .to_http_request();
        assert!(protect_trigger_route(&req, &ctx).is_err());
    }
}
