mod registry_tests;
mod set_status_tests;
