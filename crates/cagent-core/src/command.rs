//! Remote work requested by the controller and the results it gets back
//!
//! A `Command` is produced by a `begin_*` transition, run by `execute` on
//! whatever task the front end likes, and the `Completion` is fed back with
//! `ViewController::apply`. Local file reads for the similarity panel travel
//! the same way so a slow disk never stalls the caller.

use std::path::{Path, PathBuf};

use crate::api::{
    ApiError, Backend, ChatRequest, ChatResponse, HelpRequest, HelpResponse, HistoryResponse,
    LanguageResponse, SimilarityResponse, Upload,
};
use crate::i18n::Language;
use crate::state::{ChatMessage, SlotId};

#[derive(Debug, Clone)]
pub enum Command {
    Chat {
        message: String,
        history: Vec<ChatMessage>,
    },
    Help {
        ticket: u64,
        query: String,
        language: Language,
    },
    Similarity {
        ticket: u64,
        file1: PathBuf,
        file2: PathBuf,
    },
    History {
        ticket: u64,
    },
    Language {
        ticket: u64,
        language: Language,
    },
    ReadFile {
        slot: SlotId,
        ticket: u64,
        path: PathBuf,
    },
}

/// A file that could be stat'ed; its text may still have failed to load
#[derive(Debug)]
pub struct FileRead {
    pub size_bytes: u64,
    pub content: Result<String, ApiError>,
}

#[derive(Debug)]
pub enum Completion {
    Chat {
        message: String,
        result: Result<ChatResponse, ApiError>,
    },
    Help {
        ticket: u64,
        result: Result<HelpResponse, ApiError>,
    },
    Similarity {
        ticket: u64,
        result: Result<SimilarityResponse, ApiError>,
    },
    History {
        ticket: u64,
        result: Result<HistoryResponse, ApiError>,
    },
    Language {
        ticket: u64,
        language: Language,
        result: Result<LanguageResponse, ApiError>,
    },
    ReadFile {
        slot: SlotId,
        ticket: u64,
        path: PathBuf,
        result: Result<FileRead, ApiError>,
    },
}

pub async fn execute<B: Backend + ?Sized>(backend: &B, command: Command) -> Completion {
    match command {
        Command::Chat { message, history } => {
            let request = ChatRequest {
                message: message.clone(),
                history,
            };
            let result = backend.chat(&request).await;
            Completion::Chat { message, result }
        }
        Command::Help {
            ticket,
            query,
            language,
        } => {
            let result = backend.help(&HelpRequest { query, language }).await;
            Completion::Help { ticket, result }
        }
        Command::Similarity {
            ticket,
            file1,
            file2,
        } => {
            let result = match (read_upload(&file1).await, read_upload(&file2).await) {
                (Ok(a), Ok(b)) => backend.similarity(a, b).await,
                (Err(e), _) | (_, Err(e)) => Err(e),
            };
            Completion::Similarity { ticket, result }
        }
        Command::History { ticket } => {
            let result = backend.history().await;
            Completion::History { ticket, result }
        }
        Command::Language { ticket, language } => {
            let result = backend.set_language(language).await;
            Completion::Language {
                ticket,
                language,
                result,
            }
        }
        Command::ReadFile { slot, ticket, path } => {
            let result = read_selected(&path).await;
            Completion::ReadFile {
                slot,
                ticket,
                path,
                result,
            }
        }
    }
}

async fn read_selected(path: &Path) -> Result<FileRead, ApiError> {
    let io_error = |message: String| ApiError::Io {
        path: path.display().to_string(),
        message,
    };

    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(e.to_string()))?;
    if !meta.is_file() {
        return Err(io_error("not a regular file".to_string()));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(e.to_string()));
    Ok(FileRead {
        size_bytes: meta.len(),
        content,
    })
}

async fn read_upload(path: &Path) -> Result<Upload, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Upload {
        file_name: file_name_of(path),
        bytes,
    })
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
