#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the rulebook workspace.
//!
//! * [`macro@rulebook_error`] turns an enum into the workspace's standard error type.
//! * [`macro@Validatable`] gives a struct the stable type identity the registry keys on.
//!
//! Examples are `ignore`d here because the generated code references crates this
//! proc-macro crate cannot depend on.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `#[source]` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&str>` and `From<String>` implementations
///   if an `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`).
/// 4. Tuple or unit variants are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use rulebook_derive::rulebook_error;
/// use std::borrow::Cow;
///
/// #[rulebook_error]
/// pub enum LoaderError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read_rules(path: &str) -> Result<String, LoaderError> {
///     std::fs::read_to_string(path).context("Reading rule source")
/// }
/// ```
#[proc_macro_attribute]
pub fn rulebook_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Derives `rulebook_registry::Validatable` for a struct.
///
/// The generated impl reports a stable type name, used to build validator keys
/// such as `Person#default`, and exposes the value as `&dyn Any` so validators
/// can downcast it.
///
/// # Arguments
///
/// * `#[validatable(name = "...")]` - Overrides the type name. Defaults to the struct identifier.
///
/// # Errors
///
/// Emits a compile-time error for enums, unions, or generic structs.
///
/// # Example
///
/// ```rust,ignore
/// use rulebook_registry::Validatable;
///
/// #[derive(Validatable)]
/// #[validatable(name = "com.example.Person")]
/// struct Person {
///     name: String,
/// }
/// ```
#[proc_macro_derive(Validatable, attributes(validatable))]
pub fn validatable(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::validatable::expand_derive(input).into()
}
