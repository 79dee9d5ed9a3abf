pub mod db;
pub mod execution {
    pub mod entity;
    pub mod repository;
}
