/// Data region addressed by cluster, directories and files live here
pub(crate) mod chain;
pub mod directory;
pub mod file;
