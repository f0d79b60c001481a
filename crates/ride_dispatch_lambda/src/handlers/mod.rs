pub mod api_gateway;
pub mod identity;
pub mod request_ride;
