//! Completion sink error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while persisting a finished workout.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Reading or writing the journal file failed.
    #[error("ワークアウト記録の読み書きに失敗しました ({path}): {source}")]
    Io {
        /// Journal path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A journal line could not be (de)serialized.
    #[error("ワークアウト記録の形式が不正です: {0}")]
    Format(#[from] serde_json::Error),

    /// The sink refused the record.
    #[error("ワークアウト記録を保存できませんでした: {0}")]
    Rejected(String),
}
