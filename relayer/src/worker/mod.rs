pub mod listener;

pub use listener::PingListener;
