//! Resource-management core for gardens and plants: payload validation,
//! store access, and the client-side list view controllers.

pub mod list_view;
pub mod store;
pub mod validate;
