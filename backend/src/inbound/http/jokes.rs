//! Joke handlers.
//!
//! ```text
//! GET    /api/v1/jokes
//! GET    /api/v1/jokes/random
//! GET    /api/v1/jokes/{id}
//! POST   /api/v1/jokes {"name":"Frisbee","content":"I was wondering why the frisbee kept getting bigger..."}
//! DELETE /api/v1/jokes/{id}
//! ```
//!
//! Reads are anonymous. Mutations without a session redirect to the login
//! page, remembering where the caller came from.

use std::ops::ControlFlow;

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ApiResult, Error, Joke, JokeId, JokeSummary, UserId};
use crate::inbound::http::outcome::{respond, split};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Number of jokes returned by the list endpoint.
pub const JOKE_LIST_LIMIT: usize = 5;

/// Page a signed-out author is returned to after logging in.
const NEW_JOKE_PATH: &str = "/jokes/new";

/// List entry.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JokeSummaryResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: JokeId,
    #[schema(example = "Frisbee")]
    pub name: String,
}

impl From<JokeSummary> for JokeSummaryResponse {
    fn from(summary: JokeSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
        }
    }
}

/// Full joke.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JokeResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: JokeId,
    #[schema(value_type = String, example = "9b2d6f8e-1c3a-4e5b-8d7f-0a1b2c3d4e5f")]
    pub owner_id: UserId,
    #[schema(example = "Frisbee")]
    pub name: String,
    #[schema(example = "I was wondering why the frisbee kept getting bigger, then it hit me.")]
    pub content: String,
    /// Whether the caller owns the joke and may delete it.
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JokeResponse {
    fn new(joke: Joke, viewer: Option<&UserId>) -> Self {
        Self {
            is_owner: viewer == Some(&joke.owner_id),
            id: joke.id,
            owner_id: joke.owner_id,
            name: joke.name,
            content: joke.content,
            created_at: joke.created_at,
            updated_at: joke.updated_at,
        }
    }
}

/// Body of `POST /jokes`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJokeRequest {
    #[serde(default)]
    #[schema(example = "Frisbee")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "I was wondering why the frisbee kept getting bigger, then it hit me.")]
    pub content: String,
}

fn missing_joke(raw_id: &str) -> Error {
    Error::not_found(format!("no such joke id {raw_id}"))
}

/// Unparseable ids name no joke, so they share the not-found response.
fn parse_joke_id(raw_id: &str) -> ApiResult<JokeId> {
    raw_id.parse().map_err(|_| missing_joke(raw_id))
}

fn joke_location(id: &JokeId) -> String {
    format!("/api/v1/jokes/{id}")
}

/// Most recent jokes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/jokes",
    responses(
        (status = 200, description = "Up to five most recent jokes", body = [JokeSummaryResponse]),
        (status = 503, description = "Joke store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["jokes"],
    operation_id = "listJokes",
    security([])
)]
#[get("/jokes")]
pub async fn list_jokes(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<JokeSummaryResponse>>> {
    let jokes = state.jokes.list(JOKE_LIST_LIMIT).await?;
    Ok(web::Json(
        jokes.into_iter().map(JokeSummaryResponse::from).collect(),
    ))
}

/// A joke picked uniformly at random.
#[utoipa::path(
    get,
    path = "/api/v1/jokes/random",
    responses(
        (status = 200, description = "Random joke", body = JokeResponse),
        (status = 404, description = "No jokes stored yet", body = ErrorSchema),
        (status = 503, description = "Joke store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["jokes"],
    operation_id = "randomJoke",
    security([])
)]
#[get("/jokes/random")]
pub async fn random_joke(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<JokeResponse>> {
    let joke = state
        .jokes
        .get_random()
        .await?
        .ok_or_else(|| Error::not_found("no jokes found"))?;
    Ok(web::Json(JokeResponse::new(
        joke,
        session.user_id().as_ref(),
    )))
}

/// A single joke.
#[utoipa::path(
    get,
    path = "/api/v1/jokes/{id}",
    params(("id" = String, Path, description = "Joke identifier")),
    responses(
        (status = 200, description = "Joke", body = JokeResponse),
        (status = 404, description = "No such joke", body = ErrorSchema),
        (status = 503, description = "Joke store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["jokes"],
    operation_id = "getJoke",
    security([])
)]
#[get("/jokes/{id}")]
pub async fn get_joke(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<JokeResponse>> {
    let raw_id = path.into_inner();
    let id = parse_joke_id(&raw_id)?;
    let joke = state
        .jokes
        .get_by_id(&id)
        .await?
        .ok_or_else(|| missing_joke(&raw_id))?;
    Ok(web::Json(JokeResponse::new(
        joke,
        session.user_id().as_ref(),
    )))
}

/// Publish a joke owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/jokes",
    request_body = CreateJokeRequest,
    responses(
        (status = 201, description = "Created", body = JokeResponse, headers(
            ("Location" = String, description = "URL of the new joke")
        )),
        (status = 303, description = "No session; redirect to login"),
        (status = 400, description = "Validation failed; details carry fieldErrors and fields", body = ErrorSchema),
        (status = 503, description = "Joke store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["jokes"],
    operation_id = "createJoke",
    security(("SessionCookie" = []))
)]
#[post("/jokes")]
pub async fn create_joke(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Result<web::Json<CreateJokeRequest>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let owner = match split(session.require_user_id(NEW_JOKE_PATH))? {
        ControlFlow::Continue(owner) => owner,
        ControlFlow::Break(response) => return Ok(response),
    };
    // Body errors surface only once the caller is known.
    let CreateJokeRequest { name, content } = match payload {
        Ok(payload) => payload.into_inner(),
        Err(err) => return Ok(err.error_response()),
    };
    let outcome = state.jokes_command.create(&owner, &name, &content).await?;
    respond(outcome, |joke| {
        let location = joke_location(&joke.id);
        HttpResponse::Created()
            .insert_header((header::LOCATION, location))
            .json(JokeResponse::new(joke, Some(&owner)))
    })
}

/// Delete a joke the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/jokes/{id}",
    params(("id" = String, Path, description = "Joke identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 303, description = "No session; redirect to login"),
        (status = 403, description = "Joke belongs to someone else", body = ErrorSchema),
        (status = 404, description = "No such joke", body = ErrorSchema),
        (status = 503, description = "Joke store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["jokes"],
    operation_id = "deleteJoke",
    security(("SessionCookie" = []))
)]
#[delete("/jokes/{id}")]
pub async fn delete_joke(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw_id = path.into_inner();
    let actor = match split(session.require_user_id(&format!("/jokes/{raw_id}")))? {
        ControlFlow::Continue(actor) => actor,
        ControlFlow::Break(response) => return Ok(response),
    };
    let id = parse_joke_id(&raw_id)?;
    let outcome = state.jokes_command.delete(&actor, &id).await?;
    respond(outcome, |()| HttpResponse::NoContent().finish())
}
