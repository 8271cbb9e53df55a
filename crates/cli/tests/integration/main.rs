mod binding_tests;
mod type_tests;
