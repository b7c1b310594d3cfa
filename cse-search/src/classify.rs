//! Classification of raw responses into success or typed failure.
//!
//! Pure mapping, no I/O:
//!
//! | outcome                          | result                                   |
//! |----------------------------------|------------------------------------------|
//! | transport error or empty body    | `RestError`, "Network Error Encountered" |
//! | 200                              | [`Classified`]                           |
//! | 400 / 404                        | `RestError` with Search Engine ID hint   |
//! | any other status                 | `RestError` with the API message         |

use crate::error::{RestError, SearchError};
use crate::transport::RawResponse;
use crate::types::api_error_message;

/// Hint appended to 400/404 messages; these almost always mean a bad `cx`.
const ENGINE_ID_HINT: &str = "Ensure you have provided a valid Google Search Engine ID";

/// `error` value used when the API answered without a body.
const EMPTY_BODY_ERROR: &str = "Did not receive a response body";

/// A successful response paired with the entity it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified<E> {
    pub entity: E,
    pub body: serde_json::Value,
}

/// Map a request outcome for `entity` to a success envelope or a [`RestError`].
///
/// # Errors
///
/// Returns a [`RestError`] for transport failures, empty bodies, and any
/// status other than 200. Error envelopes carry the raw status and body.
pub fn classify<E>(
    entity: E,
    outcome: Result<RawResponse, SearchError>,
) -> Result<Classified<E>, RestError> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => return Err(RestError::network(err.to_string(), None)),
    };

    let Some(body) = response.body else {
        return Err(RestError::network(EMPTY_BODY_ERROR, None));
    };

    let status = response.status;
    if status == 200 {
        return Ok(Classified { entity, body });
    }

    let detail = match (status, api_error_message(&body)) {
        (400 | 404, Some(message)) => format!("{message} -- {ENGINE_ID_HINT}"),
        (_, Some(message)) => message.to_owned(),
        (_, None) => unexpected_status(status),
    };
    Err(RestError::status(status, detail, body))
}

fn unexpected_status(status: u16) -> String {
    format!("An unexpected HTTP Status Code of {status} was received")
}
