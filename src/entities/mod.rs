pub mod prelude;

pub mod admins;
pub mod games;
pub mod users;
