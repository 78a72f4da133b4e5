pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_pg;
pub mod route;
pub mod schema;
pub mod service;
pub mod storage;

pub use model::{IngestItem, NewFile, StorageConfig};
pub use repository::FileRepository;
pub use repository_pg::FileRepositoryPg;
pub use schema::{FileEntity, FileUploadResponse};
pub use service::FileService;
pub use storage::DiskStorage;
