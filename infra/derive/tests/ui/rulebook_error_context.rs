use rulebook_derive::rulebook_error;
use std::borrow::Cow;

#[rulebook_error]
pub enum GateError {
    #[error("Not found{}: {type_name}", format_context(.context))]
    NotFound { type_name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

fn missing() -> Result<(), GateError> {
    Err(GateError::NotFound { type_name: "Widget".into(), context: None })
}

fn main() {
    let err = missing().context("loading Widget").unwrap_err();
    assert_eq!(err.to_string(), "Not found (loading Widget): Widget");

    let io: Result<(), std::io::Error> = Err(std::io::Error::other("disk"));
    let err = io.context("reading rules").unwrap_err();
    assert!(matches!(err, GateError::Io { context: Some(_), .. }));
}
