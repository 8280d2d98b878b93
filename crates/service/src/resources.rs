//! Repository bindings for the domain records.

use models::{
    Appointment, AppointmentFilter, Business, BusinessFilter, Category, Client, ClientFilter, NewAppointment,
    NewBusiness, NewClient,
};

use crate::repository::{Entity, HasImages, Repository};
use crate::store::Predicate;

pub type BusinessRepository = Repository<Business>;
pub type ClientRepository = Repository<Client>;
pub type AppointmentRepository = Repository<Appointment>;

impl Entity for Business {
    const KIND: &'static str = "business";
    type New = NewBusiness;
    type Filter = BusinessFilter;

    fn from_new(new: NewBusiness) -> Self {
        new.into()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    // Known tags are queried in their stored form, so `automotive` finds
    // `auto` records. Unknown tags are queried raw and rejected afterwards.
    fn predicates(filter: &BusinessFilter) -> Vec<Predicate> {
        filter
            .category()
            .map(|c| c.parse::<Category>().map(|k| k.as_str()).unwrap_or(c))
            .map(|c| Predicate::field_eq("category", c))
            .into_iter()
            .collect()
    }
}

impl HasImages for Business {
    fn images(&self) -> &[String] {
        &self.images
    }
}

impl Entity for Client {
    const KIND: &'static str = "client";
    type New = NewClient;
    type Filter = ClientFilter;

    fn from_new(new: NewClient) -> Self {
        new.into()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn predicates(_: &ClientFilter) -> Vec<Predicate> {
        Vec::new()
    }
}

impl HasImages for Client {
    fn images(&self) -> &[String] {
        &self.images
    }
}

impl Entity for Appointment {
    const KIND: &'static str = "appointment";
    type New = NewAppointment;
    type Filter = AppointmentFilter;

    fn from_new(new: NewAppointment) -> Self {
        new.into()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn predicates(filter: &AppointmentFilter) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(business_id) = filter.business_id() {
            out.push(Predicate::field_eq("businessId", business_id));
        }
        if let Some(client_id) = filter.client_id() {
            out.push(Predicate::field_eq("clientId", client_id));
        }
        out
    }
}
