pub mod common;

mod dispatcher_retry;
