use clickthrough::dom::document::Document;
use clickthrough::dom::element::ElementHandle;
use clickthrough::error::DriverError;
use clickthrough::popup::engine::{
    BUTTON_CANCEL, BUTTON_OK, PendingConfirmation, PopupButton, PopupEngine, PopupState, ResumeAction,
};
use clickthrough::transport::request::HttpMethod;

fn some_handle() -> ElementHandle {
    Document::parse("<a href=\"/posts/1\">Destroy</a>", 0)
        .links()
        .next()
        .expect("fixture has a link")
        .handle()
}

fn pending(message: &str) -> PendingConfirmation {
    PendingConfirmation {
        message: message.to_string(),
        action: ResumeAction::ClickLink {
            link: some_handle(),
            method: HttpMethod::Delete,
        },
    }
}

// ============================================================================
// Idle
// ============================================================================

#[test]
fn new_engine_is_idle() {
    let engine = PopupEngine::new();
    assert!(!engine.is_blocked());
    assert!(engine.message().is_none());
    assert_eq!(engine.state(), &PopupState::Idle);
}

#[test]
fn press_while_idle_is_illegal() {
    let mut engine = PopupEngine::new();
    for button in [BUTTON_OK, BUTTON_CANCEL, "Weird button"] {
        match engine.press_button(button) {
            Err(DriverError::IllegalState(msg)) => assert_eq!(msg, "no pending confirmation"),
            other => panic!("Expected IllegalState for {:?}, got {:?}", button, other),
        }
    }
    assert!(!engine.is_blocked());
}

// ============================================================================
// Blocked
// ============================================================================

#[test]
fn block_holds_message() {
    let mut engine = PopupEngine::new();
    engine.block(pending("Are you sure?")).unwrap();
    assert!(engine.is_blocked());
    assert_eq!(engine.message(), Some("Are you sure?"));
    // querying has no side effect
    assert!(engine.is_blocked());
}

#[test]
fn second_block_is_illegal() {
    let mut engine = PopupEngine::new();
    engine.block(pending("first")).unwrap();
    let err = engine.block(pending("second")).unwrap_err();
    assert!(matches!(err, DriverError::IllegalState(_)));
    assert_eq!(engine.message(), Some("first"));
}

#[test]
fn ok_returns_the_deferred_action() {
    let mut engine = PopupEngine::new();
    engine.block(pending("Are you sure?")).unwrap();

    let action = engine.press_button(BUTTON_OK).unwrap();
    assert_eq!(
        action,
        Some(ResumeAction::ClickLink {
            link: some_handle(),
            method: HttpMethod::Delete,
        })
    );
    assert!(!engine.is_blocked());
}

#[test]
fn cancel_discards_the_action() {
    let mut engine = PopupEngine::new();
    engine.block(pending("Are you sure?")).unwrap();

    assert_eq!(engine.press_button(BUTTON_CANCEL).unwrap(), None);
    assert!(!engine.is_blocked());
    assert!(engine.press_button(BUTTON_OK).is_err());
}

#[test]
fn unknown_button_keeps_engine_blocked() {
    let mut engine = PopupEngine::new();
    engine.block(pending("Are you sure?")).unwrap();

    match engine.press_button("Weird button") {
        Err(DriverError::UnknownButton(name)) => assert_eq!(name, "Weird button"),
        other => panic!("Expected UnknownButton, got {:?}", other),
    }
    assert!(engine.is_blocked());
    assert!(engine.press_button(BUTTON_OK).unwrap().is_some());
}

#[test]
fn buttons_are_case_sensitive() {
    assert_eq!("OK".parse::<PopupButton>().unwrap(), PopupButton::Ok);
    assert_eq!("CANCEL".parse::<PopupButton>().unwrap(), PopupButton::Cancel);
    assert!("ok".parse::<PopupButton>().is_err());
}

#[test]
fn abandon_returns_to_idle() {
    let mut engine = PopupEngine::new();
    assert!(engine.abandon().is_none());

    engine.block(pending("Are you sure?")).unwrap();
    let dropped = engine.abandon().expect("pending confirmation");
    assert_eq!(dropped.message, "Are you sure?");
    assert!(!engine.is_blocked());
}

#[test]
fn form_confirmation_resumes_submit() {
    let mut engine = PopupEngine::new();
    let form = some_handle();
    engine
        .block(PendingConfirmation {
            message: "Submit?".into(),
            action: ResumeAction::SubmitForm { form, button: None },
        })
        .unwrap();
    assert_eq!(
        engine.press_button(BUTTON_OK).unwrap(),
        Some(ResumeAction::SubmitForm { form, button: None })
    );
}
