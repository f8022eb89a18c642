//! Engine bridge to an external program speaking JSON over stdio.
//!
//! The program is started once per batch. It receives
//! `{"model": ..., "doc_ids": [...], "texts": [...]}` on stdin and must print
//! `{"conllu": "...", "errors": [...]}` on stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::engine::{AnnotationEngine, EngineOutput};
use crate::request::AnnotationRequest;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("model file `{}` is not readable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to run `{}`: {source}", .program.display())]
    Io {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{}` exited with {status}: {stderr}", .program.display())]
    Failed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    #[error("`{}` spoke an unexpected protocol: {source}", .program.display())]
    Protocol {
        program: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A model file the external program will be pointed at.
#[derive(Debug, Clone)]
pub struct CommandModel {
    path: PathBuf,
}

#[derive(Serialize)]
struct CommandRequest<'a> {
    model: &'a Path,
    doc_ids: &'a [String],
    texts: &'a [String],
}

#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn io_error(&self, source: io::Error) -> CommandError {
        CommandError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl AnnotationEngine for CommandEngine {
    type Model = CommandModel;
    type Error = CommandError;

    fn load(&self, path: &Path) -> Result<CommandModel, CommandError> {
        File::open(path).map_err(|source| CommandError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(CommandModel {
            path: path.to_path_buf(),
        })
    }

    fn is_loaded(&self, model: &CommandModel) -> bool {
        model.path.is_file()
    }

    fn annotate(&self, model: &CommandModel, request: &AnnotationRequest) -> Result<EngineOutput, CommandError> {
        let payload = serde_json::to_vec(&CommandRequest {
            model: &model.path,
            doc_ids: request.doc_ids(),
            texts: request.texts(),
        })
        .map_err(|source| CommandError::Protocol {
            program: self.program.clone(),
            source,
        })?;

        debug!(program = %self.program.display(), bytes = payload.len(), "starting engine");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.io_error(source))?;

        // Feed stdin from a separate thread so a chatty child cannot block on a full stdout pipe.
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || -> io::Result<()> {
            match stdin {
                Some(mut stdin) => match stdin.write_all(&payload) {
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                },
                None => Ok(()),
            }
        });

        let output = child.wait_with_output().map_err(|source| self.io_error(source))?;
        writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked")))
            .map_err(|source| self.io_error(source))?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|source| CommandError::Protocol {
            program: self.program.clone(),
            source,
        })
    }
}
