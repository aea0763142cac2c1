//! Common test utilities for integration tests
#![allow(dead_code)]

use sessions_mcp::SessionsServerHandler;
use tempfile::NamedTempFile;

/// Create a test handler with temporary storage
pub fn get_test_handler() -> (SessionsServerHandler, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let handler = SessionsServerHandler::new(temp_file.path().to_str().unwrap()).unwrap();
    (handler, temp_file)
}

/// Extract the ID from an add_* response
/// Response format: "<Kind> created with ID: <id> ..."
pub fn extract_id_from_response(response: &str) -> String {
    let start = response.find("ID: ").expect("response carries an ID") + 4;
    response[start..]
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

/// Create a song through the tool surface and return its ID
pub async fn add_song(handler: &SessionsServerHandler, title: &str) -> String {
    let response = handler
        .handle_add_song(title.to_string(), None, None, None, None)
        .await
        .unwrap();
    extract_id_from_response(&response)
}

/// Create a task from smart input and return its ID
pub async fn add_task(handler: &SessionsServerHandler, song_id: &str, text: &str) -> String {
    let response = handler
        .handle_add_task(song_id.to_string(), text.to_string())
        .await
        .unwrap();
    extract_id_from_response(&response)
}
