#![allow(dead_code)]

use rulebook_derive::Validatable;

#[derive(Validatable)]
#[validatable(name = "Person#strict")]
struct Person;

fn main() {}
