#![allow(dead_code)]

use rulebook_derive::Validatable;

#[derive(Validatable)]
struct Wrapper<T> {
    inner: T,
}

fn main() {}
