#![allow(dead_code)]

use rulebook_derive::Validatable;

#[derive(Validatable)]
#[validatable(tag = "Person")]
struct Person;

fn main() {}
