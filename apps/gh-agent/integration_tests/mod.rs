mod commands;
mod helpers;
mod run;
