mod compile_tests;
mod execute_tests;
mod fixtures;
