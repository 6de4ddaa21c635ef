mod handlers;
mod server;

pub use server::{router, run, AppContext};
