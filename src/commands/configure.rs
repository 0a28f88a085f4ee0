use super::AppContext;
use crate::cli::ConfigCommands;
use crate::utils::error::{AppError, AppResult, FlowResult, handle_flow};
use crate::utils::output::{OutputStyle, print_success};
use std::path::{Path, PathBuf};

pub fn handle_config_command(ctx: &mut AppContext, command: Option<ConfigCommands>) -> AppResult<()> {
    match command {
        None | Some(ConfigCommands::Show) => handle_show_command(ctx),
        Some(ConfigCommands::Init { path }) => {
            let path = resolve_path(ctx, path);
            handle_init_command(ctx, &path)
        }
        Some(ConfigCommands::Reload { path }) => {
            let path = resolve_path(ctx, path);
            handle_reload_command(ctx, &path)
        }
    }
}

fn resolve_path(ctx: &AppContext, path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| ctx.router.config().config_path().to_path_buf())
}

fn handle_show_command(ctx: &AppContext) -> AppResult<()> {
    let paths = ctx.router.paths();
    OutputStyle::print_summary(ctx.router.config().config_path(), &ctx.router.summary());
    OutputStyle::print_field_colored("Prompts", &paths.prompts_file.display().to_string(), OutputStyle::content);
    OutputStyle::print_field_colored("CLI log", &paths.cli_log.display().to_string(), OutputStyle::content);
    OutputStyle::print_field_colored("Log level", &paths.log_level, OutputStyle::muted);
    OutputStyle::print_field_colored("Model", &paths.model, OutputStyle::muted);
    Ok(())
}

fn handle_init_command(ctx: &mut AppContext, path: &Path) -> AppResult<()> {
    if path.exists() && !ctx.confirm(&format!("Overwrite '{}'?", path.display()), false) {
        handle_flow(FlowResult::Cancelled("Configuration left unchanged".to_string()));
        return Ok(());
    }

    if !ctx.router.create_config_file(path) {
        return Err(AppError::Persistence(format!(
            "Could not write {} (details in {})",
            path.display(),
            ctx.router.paths().router_log.display()
        )));
    }

    print_success(&format!("Default configuration written to {}", path.display()));
    Ok(())
}

fn handle_reload_command(ctx: &mut AppContext, path: &Path) -> AppResult<()> {
    if !ctx.router.reload(path) {
        return Err(AppError::Config(format!(
            "Could not load {} (details in {})",
            path.display(),
            ctx.router.paths().router_log.display()
        )));
    }

    print_success(&format!("Configuration loaded from {}", path.display()));
    handle_show_command(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;
    use crate::config::Configuration;
    use crate::core::registry::tests::RecordingGenerator;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_reload() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, Arc::new(RecordingGenerator::default()));

        handle_config_command(&mut ctx, Some(ConfigCommands::Init { path: None })).unwrap();
        let written = Configuration::read(&temp.path().join("config.toml")).unwrap();
        assert!(written.is_valid());

        handle_config_command(&mut ctx, Some(ConfigCommands::Reload { path: None })).unwrap();
        handle_config_command(&mut ctx, None).unwrap();
    }

    #[test]
    fn test_reload_of_invalid_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, Arc::new(RecordingGenerator::default()));
        let before = ctx.router.summary();

        let path = temp.path().join("partial.toml");
        std::fs::write(&path, "[logger]\nstream = true\n").unwrap();

        let result = handle_config_command(&mut ctx, Some(ConfigCommands::Reload { path: Some(path) }));
        assert!(matches!(result, Err(AppError::Config(_))));
        assert_eq!(ctx.router.summary(), before);
    }
}
