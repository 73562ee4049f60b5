mod core;
mod repositories;
mod runs;

pub use self::core::GitHubClient;
pub use self::repositories::RepositoryDto;
pub use self::runs::{WorkflowRunDto, WorkflowRunsPageDto};
