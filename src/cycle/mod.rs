pub mod aggregate;
pub mod tracker;
pub mod transitions;
pub mod workdays;
