#![allow(dead_code)]

use rulebook_derive::Validatable;

#[derive(Validatable)]
enum Shape {
    Circle,
}

fn main() {}
