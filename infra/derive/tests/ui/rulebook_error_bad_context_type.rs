use rulebook_derive::rulebook_error;

#[rulebook_error]
pub enum LoaderError {
    #[error("Missing: {type_name}")]
    Missing { type_name: String, context: String },
}

fn main() {}
