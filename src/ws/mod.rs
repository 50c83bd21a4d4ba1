pub mod connctx;
pub mod dispatcher;
pub mod handler;
