mod breadcrumbs;
mod repositories;

pub use breadcrumbs::BreadcrumbsScreen;
pub use repositories::RepositoriesScreen;
