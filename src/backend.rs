use std::collections::HashMap;
use std::sync::RwLock;

use dashmap::DashMap;
use log::{debug, info, warn};
use serde_json::Value;
use tower_lsp::{
    async_trait,
    jsonrpc::Error,
    lsp_types::{
        CodeAction, CodeActionKind, CodeActionOrCommand, CodeActionParams,
        CodeActionProviderCapability, CodeActionResponse, Command, DidChangeTextDocumentParams,
        DidCloseTextDocumentParams, DidOpenTextDocumentParams, ExecuteCommandOptions,
        ExecuteCommandParams, InitializeParams, InitializeResult, InitializedParams, MessageType,
        Range, ServerCapabilities, ServerInfo, TextDocumentContentChangeEvent,
        TextDocumentSyncCapability, TextDocumentSyncKind, TextEdit, Url, WorkspaceEdit,
    },
    Client, LanguageServer,
};

use crate::command::{run_generate, GenerateRequest, GENERATE_COMMAND};
use crate::config::ScriptConfig;
use crate::error::CommandError;
use crate::gate::has_vue_extension;
use crate::lineindex::LineIndex;
use crate::merge::{EditMode, ScriptEdit};
use crate::notification::{StatusLevel, StatusNotification, StatusParams};

#[derive(Debug, Clone)]
pub(crate) struct StoredDocument {
    text: String,
}

impl StoredDocument {
    pub(crate) fn new(text: String) -> Self {
        Self { text }
    }

    pub(crate) fn apply_content_changes(&mut self, changes: Vec<TextDocumentContentChangeEvent>) {
        for change in changes {
            let Some(range) = change.range else {
                self.text = change.text;
                continue;
            };

            let line_index = LineIndex::new(&self.text);
            let span = line_index
                .offset_at(&range.start)
                .zip(line_index.offset_at(&range.end));
            match span {
                Some((start, end)) if start <= end => {
                    self.text.replace_range(start..end, &change.text);
                }
                _ => {
                    warn!("dropping change with invalid range {range:?}, replacing whole text");
                    self.text = change.text;
                }
            }
        }
    }

    /// Text covered by `range`.
    pub(crate) fn slice(&self, range: &Range) -> Option<&str> {
        let line_index = LineIndex::new(&self.text);
        let start = line_index.offset_at(&range.start)?;
        let end = line_index.offset_at(&range.end)?;
        self.text.get(start..end)
    }

    pub(crate) fn text_edit(&self, edit: &ScriptEdit) -> TextEdit {
        let line_index = LineIndex::new(&self.text);
        let range = match edit.mode {
            EditMode::Insert => {
                let end = line_index.end_position();
                Range::new(end, end)
            }
            EditMode::Replace => Range::new(
                line_index.position_at(edit.range.start),
                line_index.position_at(edit.range.end),
            ),
        };
        TextEdit::new(range, edit.text.clone())
    }
}

/// Arguments of `vue-fast-script.generate`: `[uri, range]`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GenerateArguments {
    pub uri: Url,
    pub range: Range,
}

impl GenerateArguments {
    pub(crate) fn parse(arguments: Vec<Value>) -> Result<Self, CommandError> {
        let mut arguments = arguments.into_iter();
        let (Some(uri), Some(range)) = (arguments.next(), arguments.next()) else {
            return Err(CommandError::InvalidArguments {
                reason: "expected [uri, range]".to_string(),
            });
        };
        let uri = serde_json::from_value(uri).map_err(|err| CommandError::InvalidArguments {
            reason: format!("uri: {err}"),
        })?;
        let range = serde_json::from_value(range).map_err(|err| CommandError::InvalidArguments {
            reason: format!("range: {err}"),
        })?;
        Ok(Self { uri, range })
    }

    pub(crate) fn to_values(&self) -> Vec<Value> {
        vec![
            Value::String(self.uri.to_string()),
            serde_json::to_value(self.range).unwrap_or(Value::Null),
        ]
    }
}

pub struct Backend {
    client: Client,
    documents: DashMap<Url, StoredDocument>,
    config: RwLock<ScriptConfig>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DashMap::new(),
            config: RwLock::new(ScriptConfig::default()),
        }
    }

    pub fn update_document(&self, uri: Url, text: String) {
        self.documents.insert(uri, StoredDocument::new(text));
    }

    pub fn remove_document(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    fn config(&self) -> ScriptConfig {
        self.config
            .read()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    fn set_config(&self, config: ScriptConfig) {
        match self.config.write() {
            Ok(mut current) => *current = config,
            Err(err) => warn!("could not store configuration: {err}"),
        }
    }

    /// Runs the pipeline against the stored document. The document guard is
    /// released before returning so nothing is held across an await.
    fn prepare_generate(
        &self,
        arguments: &GenerateArguments,
        config: &ScriptConfig,
    ) -> Result<(Option<WorkspaceEdit>, Vec<StatusParams>), CommandError> {
        let uri = &arguments.uri;
        let document = self
            .documents
            .get(uri)
            .ok_or_else(|| CommandError::DocumentNotOpen {
                uri: uri.to_string(),
            })?;
        let selection = document
            .slice(&arguments.range)
            .ok_or_else(|| CommandError::InvalidArguments {
                reason: format!("range {:?} is outside the document", arguments.range),
            })?;

        let outcome = run_generate(
            &GenerateRequest {
                path: uri.path(),
                text: &document.text,
                selection,
            },
            config,
        )?;

        let workspace_edit = outcome.edit.map(|edit| {
            let mut changes = HashMap::new();
            changes.insert(uri.clone(), vec![document.text_edit(&edit)]);
            WorkspaceEdit::new(changes)
        });
        Ok((workspace_edit, outcome.messages))
    }

    async fn send_status(&self, status: StatusParams) {
        if status.level == StatusLevel::Error {
            self.client
                .show_message(MessageType::ERROR, status.message.clone())
                .await;
        }
        self.client
            .log_message(status.level.into(), status.message.clone())
            .await;
        self.client
            .send_notification::<StatusNotification>(status)
            .await;
    }

    async fn generate(&self, arguments: Vec<Value>) -> Result<Option<Value>, Error> {
        let config = self.config();
        let prepared = GenerateArguments::parse(arguments)
            .and_then(|arguments| self.prepare_generate(&arguments, &config));

        let (workspace_edit, messages) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                debug!("generate stopped: {err}");
                self.send_status(failure_status(err, &config)?).await;
                return Ok(None);
            }
        };

        let Some(workspace_edit) = workspace_edit else {
            for status in messages {
                self.send_status(status).await;
            }
            return Ok(None);
        };

        let mut plan = StatusPlan::split(messages);
        for status in std::mem::take(&mut plan.before) {
            self.send_status(status).await;
        }

        let applied = match self.client.apply_edit(workspace_edit).await {
            Ok(response) if response.applied => EditApplied::Yes,
            Ok(response) => EditApplied::Rejected(response.failure_reason),
            Err(err) => EditApplied::Failed(err.message.to_string()),
        };
        if let Some(status) = plan.after_edit(applied, config.message_duration_ms) {
            self.send_status(status).await;
        }

        Ok(None)
    }
}

/// How the client answered `workspace/applyEdit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditApplied {
    Yes,
    Rejected(Option<String>),
    Failed(String),
}

/// Status messages of one edit: announcements go out before the edit is
/// applied, the last message only once the client confirms it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusPlan {
    pub before: Vec<StatusParams>,
    pub done: Option<StatusParams>,
}

impl StatusPlan {
    pub(crate) fn split(mut messages: Vec<StatusParams>) -> Self {
        let done = messages.pop();
        Self {
            before: messages,
            done,
        }
    }

    pub(crate) fn after_edit(self, applied: EditApplied, duration_ms: u64) -> Option<StatusParams> {
        match applied {
            EditApplied::Yes => self.done,
            EditApplied::Rejected(reason) => {
                let reason = reason.unwrap_or_else(|| "edit rejected by the client".to_string());
                warn!("workspace edit not applied: {reason}");
                Some(StatusParams::error(reason, duration_ms))
            }
            EditApplied::Failed(reason) => {
                warn!("workspace edit failed: {reason}");
                Some(StatusParams::error(reason, duration_ms))
            }
        }
    }
}

/// Malformed arguments are a protocol error; every other failure is reported
/// to the user as a status message.
pub(crate) fn failure_status(err: CommandError, config: &ScriptConfig) -> Result<StatusParams, Error> {
    match err {
        CommandError::InvalidArguments { reason } => Err(Error::invalid_params(reason)),
        err => Ok(err.to_status(config)),
    }
}

/// The generate action for a selection, offered only for a non-empty range in
/// an open `.vue` document.
pub(crate) fn generate_action(uri: Url, range: Range, is_open: bool) -> Option<CodeAction> {
    if range.start == range.end || !has_vue_extension(uri.path()) || !is_open {
        return None;
    }

    let title = "Generate script declaration".to_string();
    let arguments = GenerateArguments { uri, range };
    Some(CodeAction {
        title: title.clone(),
        kind: Some(CodeActionKind::REFACTOR),
        command: Some(Command {
            title,
            command: GENERATE_COMMAND.to_string(),
            arguments: Some(arguments.to_values()),
        }),
        ..Default::default()
    })
}

pub(crate) fn check_command(command: &str) -> Result<(), Error> {
    if command == GENERATE_COMMAND {
        Ok(())
    } else {
        Err(Error::invalid_request())
    }
}

#[async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult, Error> {
        self.set_config(ScriptConfig::from_initialization_options(
            params.initialization_options,
        ));

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![GENERATE_COMMAND.to_string()],
                    ..Default::default()
                }),
                ..ServerCapabilities::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("initialized with {:?}", self.config());
    }

    async fn shutdown(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("file opened: {}", params.text_document.uri);
        self.update_document(params.text_document.uri, params.text_document.text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let DidChangeTextDocumentParams {
            text_document,
            content_changes,
        } = params;

        let uri = text_document.uri;

        if let Some(mut document) = self.documents.get_mut(&uri) {
            document.apply_content_changes(content_changes);
            return;
        }

        if let Some(change) = content_changes.into_iter().last() {
            if change.range.is_none() {
                self.update_document(uri, change.text);
            } else {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!(
                            "Received incremental change for unopened document {uri}. Ignoring update."
                        ),
                    )
                    .await;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("file closed: {}", params.text_document.uri);
        self.remove_document(&params.text_document.uri);
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>, Error> {
        let uri = params.text_document.uri;
        let is_open = self.documents.contains_key(&uri);

        Ok(generate_action(uri, params.range, is_open)
            .map(|action| vec![CodeActionOrCommand::CodeAction(action)]))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>, Error> {
        check_command(&params.command)?;
        self.generate(params.arguments).await
    }
}
