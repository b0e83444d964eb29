pub mod flight_session_service;
pub mod input_filter;
pub mod persistence;
pub mod recorder;
pub mod resource_service;
pub mod session_form;
