pub mod alert_forwarder;

pub use alert_forwarder::alert_forwarder_worker;
