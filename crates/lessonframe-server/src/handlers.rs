//! HTTP handlers.
//!
//! Handler bodies are JSON whatever the request's content type: page scripts
//! post `JSON.stringify(..)` with the default form content type. The studio
//! form is also accepted as a native url-encoded submission.

use axum::{
    Form, Json,
    body::{Body, Bytes},
    extract::{FromRequest, Path, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use lessonframe_proto::{ReportEndpoint, StateTransitionReport, VersionReport};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{AppState, events::PublishedEvent, settings::StudioSubmit};

/// GET /student_view
pub async fn student_view(State(state): State<AppState>) -> Html<String> {
    Html(state.settings().await.render_student_view())
}

/// GET /studio_view
pub async fn studio_view(State(state): State<AppState>) -> Html<String> {
    Html(state.settings().await.render_studio_view())
}

/// GET /author_view
pub async fn author_view(State(state): State<AppState>) -> Html<String> {
    Html(state.settings().await.render_author_view())
}

/// POST /handler/studio_submit
pub async fn studio_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let submit: StudioSubmit = match parse_json(&body) {
        Ok(submit) => submit,
        Err(status) if status == StatusCode::BAD_REQUEST && is_form_encoded(&headers) => {
            parse_form(headers, body).await?
        },
        Err(status) => return Err(status),
    };

    let mut settings = state.settings.write().await;
    settings.apply(submit);
    tracing::info!(lesson_id = %settings.lesson_id, src = %settings.src, "settings updated");

    Ok(Json(json!({ "result": "success" })))
}

/// POST /handler/on_exploration_loaded
pub async fn on_exploration_loaded(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let report: VersionReport = match parse_json(&body) {
        Ok(report) => report,
        Err(status) => return status,
    };
    let lesson_id = state.settings().await.lesson_id;
    publish(&state, PublishedEvent::version(ReportEndpoint::ExplorationLoaded, &lesson_id, &report))
}

/// POST /handler/on_state_transition
pub async fn on_state_transition(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let report: StateTransitionReport = match parse_json(&body) {
        Ok(report) => report,
        Err(status) => return status,
    };
    let lesson_id = state.settings().await.lesson_id;
    publish(&state, PublishedEvent::state_transition(&lesson_id, &report))
}

/// POST /handler/on_exploration_completed
pub async fn on_exploration_completed(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let report: VersionReport = match parse_json(&body) {
        Ok(report) => report,
        Err(status) => return status,
    };
    let lesson_id = state.settings().await.lesson_id;
    let event = PublishedEvent::version(ReportEndpoint::ExplorationCompleted, &lesson_id, &report);
    publish(&state, event)
}

/// GET /i18n/:lang
pub async fn translations(State(state): State<AppState>, Path(lang): Path<String>) -> Response {
    match state.translations.lookup(&lang) {
        Some((served, catalog)) => {
            if served != lang {
                tracing::debug!(requested = %lang, served, "catalog fallback");
            }
            Json(catalog.clone()).into_response()
        },
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Decode a JSON body: `400` if it is not JSON, `422` if it has the wrong
/// shape.
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, StatusCode> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(%err, "rejected request body");
        if err.is_data() { StatusCode::UNPROCESSABLE_ENTITY } else { StatusCode::BAD_REQUEST }
    })
}

async fn parse_form<T: DeserializeOwned>(headers: HeaderMap, body: Bytes) -> Result<T, StatusCode> {
    let mut request = Request::new(Body::from(body));
    *request.method_mut() = Method::POST;
    *request.headers_mut() = headers;

    match Form::<T>::from_request(request, &()).await {
        Ok(Form(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(%rejection, "rejected form body");
            Err(rejection.status())
        },
    }
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn publish(state: &AppState, event: PublishedEvent) -> StatusCode {
    tracing::debug!(event = event.name, "publishing");
    match state.events.publish(event) {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::error!(%err, "failed to publish event");
            StatusCode::INTERNAL_SERVER_ERROR
        },
    }
}
