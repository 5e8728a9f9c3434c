pub mod session_response;
pub mod session_routes;
