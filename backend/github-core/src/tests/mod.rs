mod classify;
mod endpoint;
mod github;
mod present;
mod rate_limit;
mod retry;
