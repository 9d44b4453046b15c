pub mod cdp;
pub mod helpers;
pub mod math;
pub mod oracle;
pub mod types;
