pub use super::class::Entity as Class;
pub use super::course::Entity as Course;
pub use super::subject::Entity as Subject;
pub use super::user::Entity as User;
pub use super::user_managed_level::Entity as UserManagedLevel;
pub use super::user_subject::Entity as UserSubject;
