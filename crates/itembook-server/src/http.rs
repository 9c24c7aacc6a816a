//! HTTP endpoint handlers
//!
//! Each handler performs at most one read-then-write sequence against the
//! store. Successful mutations queue a flash and redirect to the listing.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};

use itembook_core::{ItemDraft, ItemId, StoreError};

use crate::error::ServerError;
use crate::flash::{self, Flash};
use crate::form::{FormValues, ItemForm};
use crate::views;
use crate::AppState;

/// Parse an `{id}` path segment. Only plain decimal integers name an item;
/// anything else is treated like a missing route.
pub fn parse_id(raw: &str) -> Result<ItemId, ServerError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServerError::InvalidId(raw.to_string()));
    }
    raw.parse().map_err(|_| ServerError::InvalidId(raw.to_string()))
}

/// Render a page. `clear_flash` expires the flash cookie, whether or not it
/// could be read.
fn page(status: StatusCode, clear_flash: bool, body: String) -> Response {
    let mut response = (status, Html(body)).into_response();
    if clear_flash {
        response.headers_mut().insert(
            header::SET_COOKIE,
            header::HeaderValue::from_static(flash::CLEAR_COOKIE),
        );
    }
    response
}

/// 302 to the listing, queuing a flash for it.
fn redirect_to_index(flash: Flash) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, flash.set_cookie()),
        ],
    )
        .into_response()
}

/// Validate a submitted form. On failure, returns what the user typed and
/// the message to show next to it.
fn read_form(
    form: Result<Form<ItemForm>, FormRejection>,
) -> Result<ItemDraft, (FormValues, String)> {
    let Form(form) = form.map_err(|rejection| {
        let message = rejection.body_text();
        tracing::warn!("Unreadable item form: {}", message);
        (FormValues::default(), message)
    })?;

    let values = form.values();
    form.into_draft().map_err(|e| {
        tracing::warn!("Rejected item form ({}): {}", e.field(), e);
        (values, e.to_string())
    })
}

/// List all items
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let items = state.store.list_all()?;
    let flash = Flash::from_headers(&headers);
    Ok(page(
        StatusCode::OK,
        flash::is_pending(&headers),
        views::index(&items, flash.as_ref()),
    ))
}

/// Show an empty create form
pub async fn create_form(headers: HeaderMap) -> Response {
    let flash = Flash::from_headers(&headers);
    page(
        StatusCode::OK,
        flash::is_pending(&headers),
        views::create_form(&FormValues::default(), None, flash.as_ref()),
    )
}

/// Create an item from the submitted form
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ItemForm>, FormRejection>,
) -> Result<Response, ServerError> {
    match read_form(form) {
        Ok(draft) => {
            state.store.create(draft)?;
            Ok(redirect_to_index(Flash::success("Created successfully!")))
        }
        Err((values, message)) => Ok(page(
            StatusCode::UNPROCESSABLE_ENTITY,
            false,
            views::create_form(&values, Some(&message), None),
        )),
    }
}

/// Show the edit form for an existing item
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let id = parse_id(&id)?;
    let item = state.store.get(id)?;
    let flash = Flash::from_headers(&headers);
    Ok(page(
        StatusCode::OK,
        flash::is_pending(&headers),
        views::edit_form(id, &FormValues::from(&item), None, flash.as_ref()),
    ))
}

/// Update an existing item from the submitted form
pub async fn edit_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    form: Result<Form<ItemForm>, FormRejection>,
) -> Result<Response, ServerError> {
    let id = parse_id(&id)?;
    // Unknown ids end with 404 before the form is looked at.
    let item = state.store.get(id)?;

    match read_form(form) {
        Ok(draft) => {
            state.store.update(id, draft)?;
            Ok(redirect_to_index(Flash::success("Updated successfully!")))
        }
        Err((values, message)) => Ok(page(
            StatusCode::UNPROCESSABLE_ENTITY,
            false,
            views::edit_form(item.id, &values, Some(&message), None),
        )),
    }
}

/// Delete an item.
///
/// Reachable with GET, like the links on the listing page; there is no
/// confirmation step.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let id = parse_id(&id)?;
    if !state.store.exists(id)? {
        return Err(StoreError::NotFound(id).into());
    }

    state.store.delete(id)?;
    Ok(redirect_to_index(Flash::success("Deleted successfully!")))
}
