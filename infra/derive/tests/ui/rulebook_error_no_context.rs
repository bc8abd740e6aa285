use rulebook_derive::rulebook_error;

#[rulebook_error]
pub enum LoaderError {
    #[error("IO error: {source}")]
    Io { source: std::io::Error },
}

fn main() {}
