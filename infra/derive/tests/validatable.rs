#[test]
fn validatable_ui() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/validatable_enum.rs");
    t.compile_fail("tests/ui/validatable_generic.rs");
    t.compile_fail("tests/ui/validatable_empty_name.rs");
    t.compile_fail("tests/ui/validatable_hash_name.rs");
    t.compile_fail("tests/ui/validatable_duplicate_name.rs");
    t.compile_fail("tests/ui/validatable_unknown_argument.rs");
}
