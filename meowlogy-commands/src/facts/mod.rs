pub mod add;
pub mod delete;
pub mod health;
pub mod like;
pub mod list;
pub mod random;
pub mod show;
