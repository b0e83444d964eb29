pub mod flight_session;
pub mod reference;
pub mod resource;
pub mod user;
