use crate::config::{
    AppConfig, LOGIN_PATH, LOGOUT_PATH, PROCESS_PATH, REGISTER_PATH, SESSION_PATH,
};
use crate::error::ClientError;
use crate::submission::UploadRequest;
use crate::submission::response::{classify_auth_response, classify_processing_response};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use shared::{LoginCredentials, ProcessingResult, SessionProbe, SessionUser, SignupCredentials};
use wasm_bindgen::JsValue;

/// Builders carrying the session cookie according to the configured API origin.
fn get(config: &AppConfig, path: &str) -> RequestBuilder {
    Request::get(&config.endpoint(path)).credentials(config.credentials())
}

fn post(config: &AppConfig, path: &str) -> RequestBuilder {
    Request::post(&config.endpoint(path)).credentials(config.credentials())
}

fn build_error(e: JsValue) -> ClientError {
    ClientError::Network(format!("could not build request: {:?}", e))
}

/// Reads status, content type and body in one go so classification can stay pure.
async fn read_response(response: Response) -> Result<(u16, Option<String>, String), ClientError> {
    let status = response.status();
    let content_type = response.headers().get("content-type");
    let body = response.text().await?;
    Ok((status, content_type, body))
}

/// Probes `/auth/me`. Any failure means "no session".
pub async fn check_session(config: &AppConfig) -> Option<SessionUser> {
    let response = match get(config, SESSION_PATH).send().await {
        Ok(resp) => resp,
        Err(e) => {
            log::warn!("Session probe failed: {}", e);
            return None;
        }
    };

    if !response.ok() {
        log::info!("No active session (HTTP {})", response.status());
        return None;
    }

    match response.json::<SessionProbe>().await {
        Ok(probe) => probe.into_user(),
        Err(e) => {
            log::warn!("Session probe returned an unreadable body: {}", e);
            None
        }
    }
}

async fn post_credentials<T: Serialize>(
    config: &AppConfig,
    path: &str,
    credentials: &T,
) -> Result<SessionUser, ClientError> {
    let response = post(config, path).json(credentials)?.send().await?;
    let (status, content_type, body) = read_response(response).await?;
    classify_auth_response(status, content_type.as_deref(), &body)
}

pub async fn login(
    config: &AppConfig,
    credentials: &LoginCredentials,
) -> Result<SessionUser, ClientError> {
    log::info!("Signing in as {}", credentials.identifier);
    post_credentials(config, LOGIN_PATH, credentials).await
}

pub async fn register(
    config: &AppConfig,
    credentials: &SignupCredentials,
) -> Result<SessionUser, ClientError> {
    log::info!("Registering {}", credentials.username);
    post_credentials(config, REGISTER_PATH, credentials).await
}

/// Best effort: the client forgets the session whatever the server says.
pub async fn logout(config: &AppConfig) {
    match post(config, LOGOUT_PATH).send().await {
        Ok(resp) if resp.ok() => log::info!("Signed out"),
        Ok(resp) => {
            log::warn!("Logout returned HTTP {}; clearing session anyway", resp.status())
        }
        Err(e) => log::warn!("Logout request failed: {}; clearing session anyway", e),
    }
}

pub async fn process_upload(
    config: &AppConfig,
    request: UploadRequest,
) -> Result<ProcessingResult, ClientError> {
    let form_data = web_sys::FormData::new().map_err(build_error)?;
    for file in &request.files {
        form_data
            .append_with_blob_and_filename("files", file.as_ref(), &file.name())
            .map_err(build_error)?;
    }
    for (name, value) in request.params.form_fields() {
        form_data.append_with_str(name, &value).map_err(build_error)?;
    }

    log::info!(
        "Submitting {} file(s) [lang={}, top_k={}, engine={}, messy={}]",
        request.files.len(),
        request.params.lang,
        request.params.top_k,
        request.params.ocr_engine,
        request.params.messy
    );

    let response = post(config, PROCESS_PATH)
        .body(form_data)?
        .send()
        .await?;
    let (status, content_type, body) = read_response(response).await?;
    classify_processing_response(status, content_type.as_deref(), &body)
}
