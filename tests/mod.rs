mod api_tests;
mod config_tests;
mod renderer_tests;
mod retry_tests;
mod validation_tests;
