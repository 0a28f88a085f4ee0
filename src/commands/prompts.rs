use super::AppContext;
use crate::cli::PromptsCommands;
use crate::utils::error::{AppError, AppResult, FlowResult, handle_flow};
use crate::utils::output::{OutputStyle, print_success};
use crate::utils::template::parse_template_variables;

pub fn handle_prompts_command(ctx: &mut AppContext, command: Option<PromptsCommands>) -> AppResult<()> {
    match command {
        None | Some(PromptsCommands::List) => handle_list(ctx),
        Some(PromptsCommands::Show { name }) => handle_show(ctx, &name),
        Some(PromptsCommands::Add {
            name,
            system,
            template,
            max_tokens,
        }) => handle_add(ctx, &name, &system, &template, max_tokens),
        Some(PromptsCommands::Remove { name }) => handle_remove(ctx, &name),
    }
}

fn not_found(name: &str) -> FlowResult {
    FlowResult::NotFound {
        item_type: "Prompt".to_string(),
        search_term: name.to_string(),
    }
}

fn handle_list(ctx: &mut AppContext) -> AppResult<()> {
    let registry = ctx.router.prompts()?;
    let entries: Vec<_> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name).map(|prompt| (name, prompt)))
        .collect();

    if entries.is_empty() {
        handle_flow(FlowResult::EmptyList {
            item_type: "prompts".to_string(),
        });
        return Ok(());
    }

    OutputStyle::print_prompt_list(&entries);
    Ok(())
}

fn handle_show(ctx: &mut AppContext, name: &str) -> AppResult<()> {
    let registry = ctx.router.prompts()?;
    match registry.get(name) {
        Some(prompt) => {
            OutputStyle::print_prompt_detailed(name, prompt);
            OutputStyle::print_variables_list(&parse_template_variables(&prompt.template));
        }
        None => handle_flow(not_found(name)),
    }
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    name: &str,
    system: &str,
    template: &str,
    max_tokens: u32,
) -> AppResult<()> {
    for (field, value) in [("name", name), ("system", system), ("template", template)] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("Prompt {} is empty", field)));
        }
    }

    let registry = ctx.router.prompts()?;
    let replacing = registry.get(name.trim()).is_some();
    if !registry.add_or_replace(name, system, template, max_tokens) {
        return Err(AppError::Persistence(format!(
            "Could not save prompt '{}' to {}",
            name,
            registry.path().display()
        )));
    }

    let verb = if replacing { "replaced" } else { "added" };
    print_success(&format!("Prompt '{}' {}", name.trim(), verb));
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, name: &str) -> AppResult<()> {
    if ctx.router.prompts()?.get(name).is_none() {
        handle_flow(not_found(name));
        return Ok(());
    }

    if !ctx.confirm(&format!("Remove prompt '{}'?", name), false) {
        handle_flow(FlowResult::Cancelled("Prompt not removed".to_string()));
        return Ok(());
    }

    let registry = ctx.router.prompts()?;
    if !registry.delete(name) {
        return Err(AppError::Persistence(format!(
            "Could not remove prompt '{}' from {}",
            name,
            registry.path().display()
        )));
    }

    print_success(&format!("Prompt '{}' removed", name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;
    use crate::core::registry::PromptRegistry;
    use crate::core::registry::tests::RecordingGenerator;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn add(name: &str, template: &str) -> Option<PromptsCommands> {
        Some(PromptsCommands::Add {
            name: name.to_string(),
            system: "sys".to_string(),
            template: template.to_string(),
            max_tokens: 64,
        })
    }

    #[test]
    fn test_add_and_remove_persist() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, Arc::new(RecordingGenerator::default()));

        handle_prompts_command(&mut ctx, add("greet", "Hello {name}")).unwrap();
        let (on_disk, _) = PromptRegistry::load(&temp.path().join("prompts.json")).unwrap();
        assert_eq!(on_disk["greet"].template, "Hello {name}");

        handle_prompts_command(
            &mut ctx,
            Some(PromptsCommands::Remove { name: "greet".to_string() }),
        )
        .unwrap();
        let (on_disk, _) = PromptRegistry::load(&temp.path().join("prompts.json")).unwrap();
        assert!(!on_disk.contains_key("greet"));
    }

    #[test]
    fn test_add_rejects_blank_template() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, Arc::new(RecordingGenerator::default()));

        assert!(matches!(
            handle_prompts_command(&mut ctx, add("greet", " ")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_list_and_show_default_prompts() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp, Arc::new(RecordingGenerator::default()));

        handle_prompts_command(&mut ctx, None).unwrap();
        handle_prompts_command(&mut ctx, Some(PromptsCommands::Show { name: "ask".to_string() })).unwrap();
        handle_prompts_command(&mut ctx, Some(PromptsCommands::Show { name: "missing".to_string() })).unwrap();
        // Read-only commands never create the registry file
        assert!(!temp.path().join("prompts.json").exists());
    }
}
