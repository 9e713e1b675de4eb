mod cli;
mod commands;
mod error;
mod logger;
