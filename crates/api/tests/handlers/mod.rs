mod auth_test;
mod middleware_test;
mod planner_test;
mod views_test;
