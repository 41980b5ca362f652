//! Phone call endpoints

pub mod call_action;
