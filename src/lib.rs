/*
Wristwatch - Wrist Watch HUD
*/
pub mod audio;
pub mod chat;
pub mod input;
pub mod objective;
pub mod settings;
pub mod status;
pub mod team;
pub mod ui;
