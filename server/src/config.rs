//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::store::{FileBackend, StoreResult, TodoStore};

/// Every flag can also be set through the environment variable named next
/// to it.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "HTTP CRUD service for todos")]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON file to persist todos in. Todos are kept in memory only when
    /// unset.
    #[arg(long, env = "DATA_FILE")]
    pub data_file: Option<PathBuf>,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn open_store(&self) -> StoreResult<TodoStore> {
        match &self.data_file {
            Some(path) => TodoStore::open(FileBackend::new(path)),
            None => Ok(TodoStore::in_memory()),
        }
    }
}
