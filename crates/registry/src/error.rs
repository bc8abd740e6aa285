//! # Registry Errors
//!
//! [`RulebookError`] separates "could not validate" from "validated and failed":
//! every variant here means the object was never judged. Rule failures are not
//! errors; they come back as a [`crate::ValidationReport`].

use std::borrow::Cow;

/// Failures raised while resolving, loading, or formatting validators.
#[rulebook_derive::rulebook_error]
pub enum RulebookError {
    /// No object was supplied.
    #[error("Null input{}: {message}", format_context(.context))]
    NullInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A load was attempted for the type and produced no validator set.
    #[error("There is no validator set{} for {type_name}", format_context(.context))]
    ConfigurationNotFound { type_name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The type has a validator set, but not for the requested namespace.
    #[error("Can't find namespace = {namespace} with type {type_name}{}", format_context(.context))]
    NamespaceNotFound {
        namespace: Cow<'static, str>,
        type_name: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// A message pattern could not be compiled.
    #[error("Invalid message template{} '{pattern}': {message}", format_context(.context))]
    InvalidTemplate {
        pattern: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// Configuration sources could not be read or deserialized.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RulebookError {
    pub(crate) fn configuration_not_found(type_name: &'static str) -> Self {
        Self::ConfigurationNotFound { type_name: type_name.into(), context: None }
    }

    pub(crate) fn namespace_not_found(namespace: &str, type_name: &'static str) -> Self {
        Self::NamespaceNotFound {
            namespace: namespace.to_owned().into(),
            type_name: type_name.into(),
            context: None,
        }
    }

    pub(crate) fn invalid_template(pattern: &str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidTemplate {
            pattern: pattern.to_owned().into(),
            message: message.into(),
            context: None,
        }
    }
}
