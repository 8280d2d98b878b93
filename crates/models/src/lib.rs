//! Domain records for businesses, clients and appointments, together with the
//! request bodies that create them and the validation rules they enforce.

pub mod appointment;
pub mod business;
pub mod category;
pub mod client;
pub mod errors;

pub use appointment::{Appointment, AppointmentFilter, CreateAppointmentRequest, NewAppointment};
pub use business::{Business, BusinessFilter, CreateBusinessRequest, NewBusiness};
pub use category::Category;
pub use client::{Client, ClientFilter, CreateClientRequest, NewClient};
pub use errors::ModelError;
