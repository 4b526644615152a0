pub mod init;
pub mod root;
pub mod settings;
pub mod show;
