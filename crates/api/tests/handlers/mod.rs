mod auth_test;
mod middleware_test;
mod mock_store_test;
mod notifier_test;
