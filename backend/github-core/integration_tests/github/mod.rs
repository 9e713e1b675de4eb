mod issues;
mod repository;
mod search;
mod user;
