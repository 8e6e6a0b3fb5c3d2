use axum::body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

/// Used in tests to both extract the raw bytes from the HTTP response body and then deserialize them into the
/// requested type. Will panic and fail the test if either step fails somehow.
pub async fn deserialize_body<T: DeserializeOwned>(response_body: body::Body) -> T {
    let bytes = body::to_bytes(response_body, usize::MAX)
        .await
        .expect("Could not read data from response body!");

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "Could not parse body content into data structure! Error: {}, Received body: {:?}",
            err, bytes
        )
    })
}

/// Reads the body of a response as UTF-8 text, for checking rendered pages
pub async fn body_text(response_body: body::Body) -> String {
    let bytes = body::to_bytes(response_body, usize::MAX)
        .await
        .expect("Could not read data from response body!");

    String::from_utf8(bytes.to_vec()).expect("Response body was not UTF-8")
}

/// Turns a handler's result into a response and splits off its status so both can be checked
pub async fn status_and_body<T: DeserializeOwned>(
    handler_result: impl IntoResponse,
) -> (StatusCode, T) {
    let response = handler_result.into_response();
    let status = response.status();

    (status, deserialize_body(response.into_body()).await)
}

/// Asserts that a response sends the browser back to the todo list
pub fn assert_redirects_home(response: &Response) {
    assert_eq!(StatusCode::SEE_OTHER, response.status());
    assert_eq!(
        Some("/"),
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|location| location.to_str().ok())
    );
}
