use std::error::Error;

use daily_brief::errors::BriefError;
use daily_brief::google::GoogleApiError;

#[test]
fn brief_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = BriefError::Render("template blew up".to_string());
    assert_error(&error);
}

#[test]
fn brief_error_display() {
    let error = BriefError::GoogleApi("API failed".to_string());
    assert_eq!(format!("{error}"), "Failed to access Google API: API failed");

    let error = BriefError::OpenAi("Model unavailable".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access OpenAI API: Model unavailable"
    );

    let error = BriefError::Http("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );
}

#[test]
fn google_errors_convert_with_their_message() {
    let google = GoogleApiError::Api {
        status: 403,
        message: "calendar disabled".to_string(),
    };
    let brief: BriefError = google.into();

    match brief {
        BriefError::GoogleApi(msg) => {
            assert!(msg.contains("403"));
            assert!(msg.contains("calendar disabled"));
        }
        other => panic!("unexpected error type: {:?}", other),
    }
}
