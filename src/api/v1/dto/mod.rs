pub mod principals;
