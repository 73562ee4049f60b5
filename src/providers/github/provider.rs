mod core;
mod reliability;

pub use self::core::GitHubProvider;
