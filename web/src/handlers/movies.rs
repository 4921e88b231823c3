//! Catalog handlers.
//!
//! Only reached after the gateway admitted the request.

use crate::error::AppError;
use crate::extractors::{AuthenticatedPrincipal, CorrelationId};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use fluxflix_core::movie::{Movie, MovieId};
use futures::{Stream, StreamExt};

/// List every movie.
///
/// # Endpoint
///
/// ```text
/// GET /movies
/// ```
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, AppError> {
    let movies = state.catalog.all().await?;
    Ok(Json(movies))
}

/// Look up one movie.
///
/// # Endpoint
///
/// ```text
/// GET /movies/:id
/// ```
///
/// # Errors
///
/// - 404 if no movie has this id
/// - 500 if the store fails
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> Result<Json<Movie>, AppError> {
    state
        .catalog
        .by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Movie", &id))
}

/// Stream one event per interval for a movie, as server-sent events.
///
/// Each frame's `data` is a JSON `MovieEvent`. The stream only ends when the
/// client disconnects, which cancels the producer.
///
/// # Endpoint
///
/// ```text
/// GET /movies/:id/events
/// Accept: text/event-stream
/// ```
///
/// # Errors
///
/// - 404 if no movie has this id (no stream is opened)
/// - 500 if the store fails
pub async fn stream_movie_events(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
    correlation_id: CorrelationId,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let events = state.catalog.stream_events(&id).await?;

    tracing::info!(
        movie_id = %id,
        user = %principal.username,
        correlation_id = %correlation_id.0,
        "Event stream opened"
    );

    let frames = events.map(|event| Event::default().json_data(&event));
    Ok(Sse::new(frames).keep_alive(KeepAlive::default()))
}
