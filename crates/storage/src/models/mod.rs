mod group;
mod role;
mod score_record;
mod student;
mod user;

pub use group::Group;
pub use role::Role;
pub use score_record::ScoreRecord;
pub use student::Student;
pub use user::User;
