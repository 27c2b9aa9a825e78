pub mod group;
pub mod roster;
pub mod score;
pub mod student;
pub mod user;
