pub mod admin_service;
pub mod admin_service_impl;
pub mod auth_service;
pub mod auth_service_impl;
pub mod catalog_service;
pub mod catalog_service_impl;

pub use admin_service::{AdminError, AdminService};
pub use admin_service_impl::SeaOrmAdminService;
pub use auth_service::{AuthError, AuthService, Principal};
pub use auth_service_impl::SeaOrmAuthService;
pub use catalog_service::{CatalogError, CatalogFilters, CatalogService, OrderUpdate};
pub use catalog_service_impl::SeaOrmCatalogService;
