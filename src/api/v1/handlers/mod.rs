pub mod health;
pub mod principals;
