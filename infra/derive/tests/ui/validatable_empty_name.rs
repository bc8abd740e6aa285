#![allow(dead_code)]

use rulebook_derive::Validatable;

#[derive(Validatable)]
#[validatable(name = "  ")]
struct Person;

fn main() {}
