pub mod assign;
pub mod init_config;
