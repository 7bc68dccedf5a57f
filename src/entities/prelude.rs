pub use super::admins::Entity as Admins;
pub use super::games::Entity as Games;
pub use super::users::Entity as Users;
