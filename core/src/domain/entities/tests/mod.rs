mod listing_tests;
mod user_tests;
