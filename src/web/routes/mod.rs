pub mod pet_routes;
