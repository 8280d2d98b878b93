use std::sync::Arc;

use configs::StorageConfig;
use service::{
    identity::IdentityVerifier,
    images::ImageManager,
    objects::ObjectStore,
    resources::{AppointmentRepository, BusinessRepository, ClientRepository},
    store::DocumentStore,
};

/// Handles shared by every request. Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub businesses: Arc<BusinessRepository>,
    pub clients: Arc<ClientRepository>,
    pub appointments: Arc<AppointmentRepository>,
    pub images: Arc<ImageManager>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        verifier: Arc<dyn IdentityVerifier>,
        storage: &StorageConfig,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            businesses: Arc::new(BusinessRepository::new(Arc::clone(&documents), storage.businesses.clone())),
            clients: Arc::new(ClientRepository::new(Arc::clone(&documents), storage.clients.clone())),
            appointments: Arc::new(AppointmentRepository::new(documents, storage.appointments.clone())),
            images: Arc::new(ImageManager::new(objects, storage.bucket.clone())),
            verifier,
            max_upload_bytes,
        }
    }
}
