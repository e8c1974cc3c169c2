pub mod auth;
pub mod classes;
pub mod courses;
pub mod health;
pub mod profile;
pub mod subjects;
pub mod users;
