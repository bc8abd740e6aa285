use rulebook_derive::rulebook_error;
use std::borrow::Cow;

#[rulebook_error]
pub enum LoaderError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rule set missing{}: {type_name}", format_context(.context))]
    Missing { type_name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read(path: &str) -> Result<String, LoaderError> {
    Ok(std::fs::read_to_string(path)?)
}

fn main() {
    let _ = read("does-not-exist.rules");
    let internal: LoaderError = "boom".into();
    assert_eq!(internal.to_string(), "Internal error: boom");
}
