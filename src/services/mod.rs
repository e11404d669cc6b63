pub mod pet_api;
pub mod photo_storage;
