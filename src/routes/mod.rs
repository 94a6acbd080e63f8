pub mod default_route;
pub mod owner_details_route;
