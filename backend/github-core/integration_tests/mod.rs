mod client;
mod github;
mod helpers;
mod tools;
