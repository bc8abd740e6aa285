use rulebook_derive::rulebook_error;

#[rulebook_error]
pub enum LoaderError {
    Io(std::io::Error),
}

fn main() {}
