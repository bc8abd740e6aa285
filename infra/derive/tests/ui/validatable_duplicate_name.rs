#![allow(dead_code)]

use rulebook_derive::Validatable;

#[derive(Validatable)]
#[validatable(name = "Person", name = "Human")]
struct Person;

fn main() {}
