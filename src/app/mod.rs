pub mod ports;
pub mod record_use_case;
