use crate::commands::{AppContext, ai, configure, notes, prompts};
use crate::utils::error::AppResult;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mnctl")]
#[command(about = "Minimal notes from the command line, with AI helpers")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to the TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "DIR", help = "Keep config, database, prompts and logs under DIR")]
    pub home: Option<PathBuf>,

    #[arg(long, global = true, help = "Also stream log records to stderr")]
    pub stream: bool,

    #[arg(short, long, global = true, help = "Answer yes to every confirmation")]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Commands {
    pub async fn execute(self, ctx: &mut AppContext) -> AppResult<()> {
        match self {
            Commands::New(args) => notes::handle_new_command(ctx, &args),
            Commands::List => notes::handle_list_command(ctx),
            Commands::Show(args) => notes::handle_show_command(ctx, &args),
            Commands::Edit(args) => notes::handle_edit_command(ctx, &args),
            Commands::Delete(args) => notes::handle_delete_command(ctx, &args),
            Commands::Search(args) => notes::handle_search_command(ctx, &args),
            Commands::Export(args) => notes::handle_export_command(ctx, &args),
            Commands::Import(args) => notes::handle_import_command(ctx, &args),
            Commands::Improve(args) => ai::handle_improve_command(ctx, &args).await,
            Commands::Summarize(args) => ai::handle_summarize_command(ctx, &args).await,
            Commands::Translate(args) => ai::handle_translate_command(ctx, &args).await,
            Commands::Ask(args) => ai::handle_ask_command(ctx, &args).await,
            Commands::Exec(args) => ai::handle_exec_command(ctx, &args).await,
            Commands::Prompts(args) => prompts::handle_prompts_command(ctx, args.command),
            Commands::Config(args) => configure::handle_config_command(ctx, args.command),
        }
    }

    /// Whether startup should offer to create missing config and prompt files
    pub fn wants_setup(&self) -> bool {
        !matches!(self, Commands::Config(_))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(visible_alias = "mk")]
    New(NewArgs),

    /// List all notes
    #[command(visible_alias = "ls")]
    List,

    /// Show a note in full
    #[command(visible_alias = "id")]
    Show(NoteIdArgs),

    /// Replace the content of a note
    #[command(visible_alias = "mod")]
    Edit(EditArgs),

    /// Delete a note
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Find notes containing text (case-insensitive)
    #[command(visible_alias = "grep")]
    Search(SearchArgs),

    /// Write a note to a text file
    Export(ExportArgs),

    /// Create a note from a text file
    Import(ImportArgs),

    /// Improve a note with AI
    Improve(NoteIdArgs),

    /// Summarize a note with AI
    Summarize(NoteIdArgs),

    /// Translate a note with AI
    Translate(TranslateArgs),

    /// Ask a question about a note
    Ask(AskArgs),

    /// Run any registered prompt on a note
    Exec(ExecArgs),

    /// Manage the prompt registry
    Prompts(PromptsArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(help = "Note content")]
    pub content: String,
}

#[derive(Args)]
pub struct NoteIdArgs {
    #[arg(help = "Note ID")]
    pub id: i64,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(help = "Note ID")]
    pub id: i64,

    #[arg(help = "New content")]
    pub content: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(help = "Note ID")]
    pub id: i64,

    #[arg(short, long, help = "Delete without confirmation")]
    pub force: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(help = "Text to look for")]
    pub query: String,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(help = "Note ID")]
    pub id: i64,

    #[arg(help = "Destination file (default: note_<id>.txt)")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(help = "File to import from")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct TranslateArgs {
    #[arg(help = "Note ID")]
    pub id: i64,

    #[arg(help = "Target language")]
    pub language: String,
}

#[derive(Args)]
pub struct AskArgs {
    #[arg(help = "Note ID")]
    pub id: i64,

    #[arg(help = "Question about the note")]
    pub question: String,
}

#[derive(Args)]
pub struct ExecArgs {
    #[arg(help = "Prompt name")]
    pub prompt: String,

    #[arg(help = "Note ID, bound as {content}")]
    pub id: i64,

    #[arg(long = "var", value_name = "KEY=VALUE", help = "Extra template binding, repeatable")]
    pub vars: Vec<String>,
}

#[derive(Args)]
pub struct PromptsArgs {
    #[command(subcommand)]
    pub command: Option<PromptsCommands>,
}

#[derive(Subcommand, Clone)]
pub enum PromptsCommands {
    /// List registered prompts
    List,

    /// Show one prompt and its variables
    Show {
        #[arg(help = "Prompt name")]
        name: String,
    },

    /// Add a prompt or replace an existing one
    Add {
        #[arg(help = "Prompt name")]
        name: String,

        #[arg(short, long, help = "System instruction")]
        system: String,

        #[arg(short, long, help = "Template with {placeholders}")]
        template: String,

        #[arg(short = 'm', long, default_value_t = crate::core::data::DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
    },

    /// Remove a prompt
    Remove {
        #[arg(help = "Prompt name")]
        name: String,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the active configuration
    Show,

    /// Write the default configuration file
    Init {
        #[arg(help = "Destination (default: the active config path)")]
        path: Option<PathBuf>,
    },

    /// Reload configuration from a file
    Reload {
        #[arg(help = "Config file (default: the active config path)")]
        path: Option<PathBuf>,
    },
}
