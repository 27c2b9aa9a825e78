pub mod admin;
pub mod groups;
pub mod reports;
pub mod roster;
pub mod scores;
pub mod students;
pub mod users;
