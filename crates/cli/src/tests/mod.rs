mod helpers_tests;
mod output_tests;
