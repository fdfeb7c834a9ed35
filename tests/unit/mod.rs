mod fakes;
mod sync_tests;
